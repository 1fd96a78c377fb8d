/// Maps country names, as the event datasets spell them, to rough centroid coordinates for
/// the shows map. This is a static table, not a geocoder: it covers the touring countries
/// that actually appear in the data plus a few common aliases. Unknown countries simply get
/// no coordinates and the map skips them.
use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref COUNTRY_CENTROIDS: HashMap<&'static str, (f64, f64)> = {
        let mut m = HashMap::new();
        m.insert("argentina", (-38.4, -63.6));
        m.insert("australia", (-25.3, 133.8));
        m.insert("austria", (47.5, 14.6));
        m.insert("belgium", (50.5, 4.5));
        m.insert("bolivia", (-16.3, -63.6));
        m.insert("brazil", (-14.2, -51.9));
        m.insert("canada", (56.1, -106.3));
        m.insert("chile", (-35.7, -71.5));
        m.insert("colombia", (4.6, -74.3));
        m.insert("costa rica", (9.7, -83.8));
        m.insert("czech republic", (49.8, 15.5));
        m.insert("denmark", (56.3, 9.5));
        m.insert("dominican republic", (18.7, -70.2));
        m.insert("ecuador", (-1.8, -78.2));
        m.insert("finland", (61.9, 25.7));
        m.insert("france", (46.2, 2.2));
        m.insert("germany", (51.2, 10.5));
        m.insert("greece", (39.1, 21.8));
        m.insert("guatemala", (15.8, -90.2));
        m.insert("hungary", (47.2, 19.5));
        m.insert("ireland", (53.4, -8.2));
        m.insert("italy", (41.9, 12.6));
        m.insert("japan", (36.2, 138.3));
        m.insert("luxembourg", (49.8, 6.1));
        m.insert("mexico", (23.6, -102.6));
        m.insert("netherlands", (52.1, 5.3));
        m.insert("new zealand", (-40.9, 174.9));
        m.insert("norway", (60.5, 8.5));
        m.insert("panama", (8.5, -80.8));
        m.insert("paraguay", (-23.4, -58.4));
        m.insert("peru", (-9.2, -75.0));
        m.insert("poland", (51.9, 19.1));
        m.insert("portugal", (39.4, -8.2));
        m.insert("puerto rico", (18.2, -66.6));
        m.insert("romania", (45.9, 25.0));
        m.insert("spain", (40.5, -3.7));
        m.insert("sweden", (60.1, 18.6));
        m.insert("switzerland", (46.8, 8.2));
        m.insert("united kingdom", (55.4, -3.4));
        m.insert("united states", (37.1, -95.7));
        m.insert("uruguay", (-32.5, -55.8));
        m.insert("venezuela", (6.4, -66.6));
        // Aliases for spellings seen in the wild.
        m.insert("usa", (37.1, -95.7));
        m.insert("united states of america", (37.1, -95.7));
        m.insert("uk", (55.4, -3.4));
        m.insert("england", (55.4, -3.4));
        m
    };
}

/// Look up a country's centroid as `(latitude, longitude)`. Matching is case-insensitive
/// and ignores surrounding whitespace.
pub fn country_coordinates(name: &str) -> Option<(f64, f64)> {
    COUNTRY_CENTROIDS.get(name.trim().to_lowercase().as_str()).copied()
}

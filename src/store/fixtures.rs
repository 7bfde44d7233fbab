//! Small test world shared by unit tests.

use geo_types::{line_string, Coord, Geometry, Rect};

use super::MemoryPlaceStore;
use crate::models::{GeoPoint, OsmType, Place, PlaceId};

pub const URUGUAY: PlaceId = PlaceId(1);
pub const MONTEVIDEO_DEPT: PlaceId = PlaceId(2);
pub const MONTEVIDEO_CITY: PlaceId = PlaceId(3);
pub const CONCEPCION_DEL_URUGUAY: PlaceId = PlaceId(4);
pub const LIECHTENSTEIN: PlaceId = PlaceId(10);
pub const VADUZ: PlaceId = PlaceId(11);
pub const VADUZ_DUPLICATE: PlaceId = PlaceId(12);
pub const VIETNAM: PlaceId = PlaceId(20);
pub const KON_TUM_PROVINCE: PlaceId = PlaceId(21);
pub const DAK_TO: PlaceId = PlaceId(22);
pub const DOG_PARK: PlaceId = PlaceId(30);
pub const RAMBLA: PlaceId = PlaceId(31);
pub const PUNTA_CARRETAS: PlaceId = PlaceId(32);
pub const LOOPVILLE: PlaceId = PlaceId(40);
pub const LOOP_COUNTY: PlaceId = PlaceId(41);
pub const ORPHANVILLE: PlaceId = PlaceId(42);

pub fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Geometry<f64> {
    Geometry::Polygon(
        Rect::new(
            Coord {
                x: min_lon,
                y: min_lat,
            },
            Coord {
                x: max_lon,
                y: max_lat,
            },
        )
        .to_polygon(),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn place(
    id: PlaceId,
    osm_type: OsmType,
    class: &str,
    place_type: &str,
    name: &str,
    display_name: &str,
    rank: u8,
    importance: f64,
    centroid: (f64, f64),
    parent: Option<PlaceId>,
) -> Place {
    let mut place = Place::new(
        id,
        osm_type,
        id.0 as i64 * 100,
        class,
        place_type,
        GeoPoint::new(centroid.0, centroid.1),
    );
    place.add_name("default", name);
    place.display_name = display_name.to_string();
    place.place_rank = rank;
    place.importance = importance;
    place.parent = parent;
    place
}

pub fn places() -> Vec<Place> {
    let mut uruguay = place(
        URUGUAY,
        OsmType::Relation,
        "place",
        "country",
        "Uruguay",
        "Uruguay",
        4,
        0.8,
        (-32.8, -56.0),
        None,
    );
    uruguay.set_geometry(rect(-58.5, -35.0, -53.1, -30.1));
    uruguay.country_code = Some("uy".to_string());
    uruguay.add_name("es", "Uruguay");
    uruguay
        .extratags
        .insert("wikidata".to_string(), "Q77".to_string());

    let mut montevideo_dept = place(
        MONTEVIDEO_DEPT,
        OsmType::Relation,
        "boundary",
        "administrative",
        "Montevideo",
        "Montevideo, Uruguay",
        8,
        0.5,
        (-34.82, -56.2),
        Some(URUGUAY),
    );
    montevideo_dept.set_geometry(rect(-56.45, -34.95, -56.0, -34.7));

    let montevideo_city = place(
        MONTEVIDEO_CITY,
        OsmType::Node,
        "place",
        "city",
        "Montevideo",
        "Montevideo, Montevideo, Uruguay",
        16,
        0.65,
        (-34.9058, -56.1913),
        Some(MONTEVIDEO_DEPT),
    );

    let mut concepcion = place(
        CONCEPCION_DEL_URUGUAY,
        OsmType::Node,
        "place",
        "city",
        "Concepción del Uruguay",
        "Concepción del Uruguay, Entre Ríos, Argentina",
        16,
        0.4,
        (-32.4833, -58.2333),
        None,
    );
    concepcion.country_code = Some("ar".to_string());

    let mut liechtenstein = place(
        LIECHTENSTEIN,
        OsmType::Relation,
        "place",
        "country",
        "Liechtenstein",
        "Liechtenstein",
        4,
        0.7,
        (47.16, 9.55),
        None,
    );
    liechtenstein.set_geometry(rect(9.47, 47.04, 9.64, 47.27));
    liechtenstein.country_code = Some("li".to_string());

    let vaduz = place(
        VADUZ,
        OsmType::Node,
        "place",
        "town",
        "Vaduz",
        "Vaduz, Liechtenstein",
        18,
        0.5,
        (47.141, 9.5209),
        Some(LIECHTENSTEIN),
    );

    let vaduz_duplicate = place(
        VADUZ_DUPLICATE,
        OsmType::Way,
        "place",
        "town",
        "Vaduz",
        "Vaduz, Liechtenstein",
        18,
        0.3,
        (47.1395, 9.523),
        Some(LIECHTENSTEIN),
    );

    let mut vietnam = place(
        VIETNAM,
        OsmType::Relation,
        "place",
        "country",
        "Việt Nam",
        "Việt Nam",
        4,
        0.75,
        (16.0, 106.0),
        None,
    );
    vietnam.set_geometry(rect(102.1, 8.5, 109.5, 23.4));
    vietnam.country_code = Some("vn".to_string());
    vietnam.add_name("en", "Vietnam");

    let mut kon_tum = place(
        KON_TUM_PROVINCE,
        OsmType::Relation,
        "boundary",
        "administrative",
        "Tỉnh Kon Tum",
        "Tỉnh Kon Tum, Việt Nam",
        8,
        0.4,
        (14.7, 107.9),
        Some(VIETNAM),
    );
    kon_tum.set_geometry(rect(107.3, 13.9, 108.5, 15.5));
    kon_tum.add_name("en", "Kon Tum Province");

    let dak_to = place(
        DAK_TO,
        OsmType::Node,
        "place",
        "village",
        "Đăk Tô",
        "Đăk Tô, Tỉnh Kon Tum, Việt Nam",
        19,
        0.2,
        (14.6935, 107.8314),
        Some(KON_TUM_PROVINCE),
    );

    let mut rambla = place(
        RAMBLA,
        OsmType::Way,
        "highway",
        "residential",
        "Rambla República del Perú",
        "Rambla República del Perú, Montevideo, Montevideo, Uruguay",
        26,
        0.1,
        (-34.9155, -56.1560),
        Some(MONTEVIDEO_CITY),
    );
    rambla.set_geometry(Geometry::LineString(geo_types::line_string![
        (x: -56.1600, y: -34.9140),
        (x: -56.1560, y: -34.9155),
        (x: -56.1500, y: -34.9170),
    ]));

    let mut dog_park = place(
        DOG_PARK,
        OsmType::Way,
        "leisure",
        "dog_park",
        "Parque Canino",
        "Parque Canino, Rambla República del Perú, Montevideo, Montevideo, Uruguay",
        30,
        0.05,
        (-34.9145, -56.1565),
        Some(RAMBLA),
    );
    dog_park.set_geometry(rect(-56.1570, -34.9150, -56.1560, -34.9140));

    // Left without a country code of its own.
    let punta_carretas = place(
        PUNTA_CARRETAS,
        OsmType::Node,
        "place",
        "suburb",
        "Punta Carretas",
        "Punta Carretas, Montevideo, Montevideo, Uruguay",
        20,
        0.15,
        (-34.9245, -56.1590),
        Some(MONTEVIDEO_CITY),
    );

    let loopville = place(
        LOOPVILLE,
        OsmType::Node,
        "place",
        "hamlet",
        "Loopville",
        "Loopville",
        20,
        0.1,
        (10.0, 10.0),
        Some(LOOP_COUNTY),
    );
    let loop_county = place(
        LOOP_COUNTY,
        OsmType::Relation,
        "boundary",
        "administrative",
        "Loop County",
        "Loop County",
        12,
        0.1,
        (10.0, 10.0),
        Some(LOOPVILLE),
    );
    let orphanville = place(
        ORPHANVILLE,
        OsmType::Node,
        "place",
        "hamlet",
        "Orphanville",
        "Orphanville",
        20,
        0.1,
        (11.0, 11.0),
        Some(PlaceId(999)),
    );

    let mut places = vec![
        uruguay,
        montevideo_dept,
        montevideo_city,
        concepcion,
        liechtenstein,
        vaduz,
        vaduz_duplicate,
        vietnam,
        kon_tum,
        dak_to,
        rambla,
        dog_park,
        punta_carretas,
        loopville,
        loop_county,
        orphanville,
    ];

    // Country codes are denormalized onto every place, as a real store would.
    for place in &mut places {
        let code = match place.id {
            MONTEVIDEO_DEPT | MONTEVIDEO_CITY | RAMBLA | DOG_PARK => "uy",
            VADUZ | VADUZ_DUPLICATE => "li",
            KON_TUM_PROVINCE | DAK_TO => "vn",
            _ => continue,
        };
        place.country_code = Some(code.to_string());
    }
    places
}

pub fn world() -> MemoryPlaceStore {
    MemoryPlaceStore::build(places())
}

//! Static glucometer reference catalog.
//!

/// One glucometer model. `class` is the connectivity type used to
/// upload readings (Bluetooth, NFC or optical port).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glucometer {
    pub gm_id: i64,
    pub model_name: &'static str,
    pub manufacturer: &'static str,
    pub year: i64,
    pub class: &'static str,
}

const CATALOG: [Glucometer; 5] = [
    Glucometer {
        gm_id: 1,
        model_name: "Contour Plus One",
        manufacturer: "Ascensia",
        year: 2016,
        class: "Bluetooth",
    },
    Glucometer {
        gm_id: 2,
        model_name: "Accu-Chek Guide",
        manufacturer: "Roche",
        year: 2017,
        class: "Bluetooth",
    },
    Glucometer {
        gm_id: 3,
        model_name: "FreeStyle Lite",
        manufacturer: "Abbott",
        year: 2015,
        class: "Optical",
    },
    Glucometer {
        gm_id: 4,
        model_name: "OneTouch Verio Flex",
        manufacturer: "LifeScan",
        year: 2016,
        class: "Bluetooth",
    },
    Glucometer {
        gm_id: 5,
        model_name: "GlucoMen Areo",
        manufacturer: "A. Minarine",
        year: 2018,
        class: "NFC",
    },
];

/// The full catalog, independent of the simulation seed.
pub fn catalog() -> &'static [Glucometer] {
    &CATALOG
}

/// A DWD webcam from the compiled-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Webcam {
    /// Stable key, also the directory name on the open data server
    pub id: &'static str,
    /// Human-readable description used in captions
    pub display_name: &'static str,
}

/// All webcams published on opendata.dwd.de.
///
/// See <https://opendata.dwd.de/weather/webcam/>.
pub const WEBCAMS: &[Webcam] = &[
    Webcam {
        id: "Hamburg-SO",
        display_name: "DWD Hamburg - Blick nach Südost, elbaufwärts (Elbphilharmonie)",
    },
    Webcam {
        id: "Hamburg-SW",
        display_name: "DWD Hamburg - Blick nach Südwest, elbabwärts (Containerterminal)",
    },
    Webcam {
        id: "Hohenpeissenberg-S",
        display_name: "Meteorologisches Observatorium Hohenpreißenberg - Blick nach Süden (Zugspitze)",
    },
    // currently offline, EXIF lookups fail and the pool moves on
    Webcam {
        id: "Hohenpeissenberg-SW",
        display_name: "Meteorologisches Observatorium Hohenpreißenberg - Blick nach Südwesten",
    },
    Webcam {
        id: "Lindenberg-NNE",
        display_name: "Meteorologisches Observatorium Lindenberg - Blick nach Nord-Nordosten",
    },
    Webcam {
        id: "Offenbach-O",
        display_name: "DWD Offenbach - Ost, Blick nach Offenbach",
    },
    Webcam {
        id: "Offenbach-W",
        display_name: "DWD Offenbach - West, Blick nach Frankfurt",
    },
    Webcam {
        id: "Schmuecke-SW",
        display_name: "Wetterstation Schmücke - Blick nach Südwest (Suhl)",
    },
    Webcam {
        id: "Warnemuende-NW",
        display_name: "Rostock-Warnemünde - Blick nach Nordwest",
    },
    Webcam {
        id: "Wasserkuppe-SW",
        display_name: "Wasserkuppe, Rhön - Blick nach Südwest",
    },
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static Webcam> {
    WEBCAMS.iter().find(|webcam| webcam.id == id)
}

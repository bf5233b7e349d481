use crate::config::Candidate;

/// The display names of the counties, as written in the trends export, and their codes.
///
/// Names are matched by exact equality, diacritics included.
pub const COUNTY_CODES: [(&str, &str); 42] = [
    ("Alba", "AB"),
    ("Arad", "AR"),
    ("Argeș", "AG"),
    ("Bacău", "BC"),
    ("Bihor", "BH"),
    ("Bistrița-Năsăud", "BN"),
    ("Botoșani", "BT"),
    ("Brașov", "BV"),
    ("Brăila", "BR"),
    ("Buzău", "BZ"),
    ("Caraș-Severin", "CS"),
    ("Cluj", "CJ"),
    ("Constanța", "CT"),
    ("Covasna", "CV"),
    ("Călărași", "CL"),
    ("Dolj", "DJ"),
    ("Dâmbovița", "DB"),
    ("Galați", "GL"),
    ("Giurgiu", "GR"),
    ("Gorj", "GJ"),
    ("Harghita", "HR"),
    ("Hunedoara", "HD"),
    ("Ialomița", "IL"),
    ("Iași", "IS"),
    ("Ilfov", "IF"),
    ("Maramureș", "MM"),
    ("Mehedinți", "MH"),
    ("Mureș", "MS"),
    ("Neamț", "NT"),
    ("Olt", "OT"),
    ("Prahova", "PH"),
    ("Satu Mare", "SM"),
    ("Sibiu", "SB"),
    ("Suceava", "SV"),
    ("Sălaj", "SJ"),
    ("Teleorman", "TR"),
    ("Timiș", "TM"),
    ("Tulcea", "TL"),
    ("Vaslui", "VS"),
    ("Vrancea", "VN"),
    ("Vâlcea", "VL"),
    ("București", "B"),
];

/// The column labels of the trends export. The date range is part of the label.
pub const CANDIDATE_LABELS: [(&str, Candidate); 4] = [
    (
        "Nicusor dan: (04.04.2025 – 04.05.2025)",
        Candidate::NicusorDan,
    ),
    (
        "Crin Antonescu: (04.04.2025 – 04.05.2025)",
        Candidate::CrinAntonescu,
    ),
    (
        "George Simion: (04.04.2025 – 04.05.2025)",
        Candidate::GeorgeSimion,
    ),
    (
        "Victor Ponta: (04.04.2025 – 04.05.2025)",
        Candidate::VictorPonta,
    ),
];

/// The code of a county display name. The name must already be stripped of its prefix.
pub fn county_code(display_name: &str) -> Option<&'static str> {
    COUNTY_CODES
        .iter()
        .find(|(name, _)| *name == display_name)
        .map(|(_, code)| *code)
}

/// Returns the code itself if `code` is one of the known county codes.
pub fn known_county_code(code: &str) -> Option<&'static str> {
    COUNTY_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(_, c)| *c)
}

pub fn candidate_for_label(label: &str) -> Option<Candidate> {
    CANDIDATE_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, c)| *c)
}

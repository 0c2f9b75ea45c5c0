/// Named bright star with literal (catalog) attributes, J2000 coordinates
pub struct BrightStar {
    pub name:          &'static str,
    pub constellation: &'static str,
    pub ra:            f64, // hours
    pub dec:           f64, // degrees
    pub magnitude:     f64, // apparent V
    pub temperature:   f64, // K
    pub class:         &'static str,
    pub distance:      f64, // pc
    pub luminosity:    f64, // solar units
    pub radius:        f64, // solar units
}

macro_rules! star {
    ($name:expr, $cnst:expr, $ra:expr, $dec:expr, $mag:expr, $temp:expr,
     $class:expr, $dist:expr, $lum:expr, $rad:expr) => {
        BrightStar {
            name: $name, constellation: $cnst, ra: $ra, dec: $dec,
            magnitude: $mag, temperature: $temp, class: $class,
            distance: $dist, luminosity: $lum, radius: $rad,
        }
    };
}

#[rustfmt::skip]
pub const BRIGHT_STARS: &[BrightStar] = &[
    //     name          cnst    ra       dec       mag    temp      class    dist    lum        rad
    star!("Sirius",     "CMa",  6.7525, -16.7161, -1.46,  9_940.0, "A1V",      2.64,     25.4,   1.71),
    star!("Canopus",    "Car",  6.3992, -52.6957, -0.74,  7_350.0, "A9II",    95.0,  10_700.0,  71.0),
    star!("Arcturus",   "Boo", 14.2610,  19.1825, -0.05,  4_286.0, "K1.5III", 11.26,    170.0,  25.4),
    star!("Vega",       "Lyr", 18.6156,  38.7837,  0.03,  9_602.0, "A0V",      7.68,     40.1,   2.36),
    star!("Capella",    "Aur",  5.2782,  45.9980,  0.08,  4_970.0, "G3III",   13.12,     78.7,  11.98),
    star!("Rigel",      "Ori",  5.2423,  -8.2016,  0.13, 12_100.0, "B8Ia",   264.0, 120_000.0,  78.9),
    star!("Procyon",    "CMi",  7.6550,   5.2250,  0.34,  6_530.0, "F5IV",     3.51,      6.93,  2.05),
    star!("Achernar",   "Eri",  1.6286, -57.2367,  0.46, 15_000.0, "B6Vep",   42.8,   3_493.0,   7.3),
    star!("Betelgeuse", "Ori",  5.9195,   7.4071,  0.50,  3_600.0, "M1Ia",   168.0, 126_000.0, 764.0),
    star!("Hadar",      "Cen", 14.0637, -60.3730,  0.61, 25_000.0, "B1III",  120.0,  41_700.0,   9.0),
    star!("Altair",     "Aql", 19.8464,   8.8683,  0.76,  7_670.0, "A7V",      5.13,     10.6,   1.79),
    star!("Aldebaran",  "Tau",  4.5987,  16.5093,  0.86,  3_910.0, "K5III",   20.0,     439.0,  45.1),
    star!("Antares",    "Sco", 16.4901, -26.4320,  0.96,  3_400.0, "M1.5Iab", 170.0, 75_900.0, 680.0),
    star!("Spica",      "Vir", 13.4199, -11.1613,  0.97, 22_400.0, "B1III",   77.0,  20_500.0,   7.47),
    star!("Pollux",     "Gem",  7.7553,  28.0262,  1.14,  4_666.0, "K0III",   10.36,     32.7,   9.06),
    star!("Fomalhaut",  "PsA", 22.9608, -29.6222,  1.16,  8_590.0, "A3V",      7.70,     16.6,   1.84),
    star!("Deneb",      "Cyg", 20.6905,  45.2803,  1.25,  8_525.0, "A2Ia",   802.0, 196_000.0, 203.0),
    star!("Regulus",    "Leo", 10.1395,  11.9672,  1.35, 12_460.0, "B8IVn",   24.3,     316.0,   4.35),
    star!("Castor",     "Gem",  7.5767,  31.8883,  1.58, 10_286.0, "A1V",     15.6,      30.0,   2.4),
    star!("Bellatrix",  "Ori",  5.4189,   6.3497,  1.64, 22_000.0, "B2III",   77.0,   9_211.0,   5.75),
    star!("Alnilam",    "Ori",  5.6036,  -1.2019,  1.69, 27_500.0, "B0Ia",   606.0, 275_000.0,  32.4),
    star!("Mirfak",     "Per",  3.4054,  49.8612,  1.79,  6_350.0, "F5Ib",   155.0,   5_000.0,  68.0),
    star!("Dubhe",      "UMa", 11.0621,  61.7510,  1.79,  4_660.0, "K0III",   37.7,     316.0,  30.0),
    star!("Alkaid",     "UMa", 13.7923,  49.3133,  1.86, 15_540.0, "B3V",     31.9,     594.0,   3.4),
    star!("Polaris",    "UMi",  2.5303,  89.2641,  1.98,  6_015.0, "F7Ib",   133.0,   1_260.0,  37.5),
];

#[test]
fn test_bright_star_table() {
    for star in BRIGHT_STARS {
        assert!((0.0..24.0).contains(&star.ra), "{}", star.name);
        assert!((-90.0..=90.0).contains(&star.dec), "{}", star.name);
        assert!(star.temperature > 2000.0, "{}", star.name);
        assert!(super::spectral::SpectralType::from_class(star.class).is_some(), "{}", star.name);
    }
    // sorted by brightness
    assert!(BRIGHT_STARS.windows(2).all(|w| w[0].magnitude <= w[1].magnitude));
}

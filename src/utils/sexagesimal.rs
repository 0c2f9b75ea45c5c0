use once_cell::sync::OnceCell;

/// Formats degrees or hours as `[-]DD:MM:SS.S`
pub fn value_to_sexagesimal(value: f64, zero: bool) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let value = value.abs();
    let mut int = value.trunc() as i64;
    let mut tenths = (value.fract() * 36000.0).round() as i64; // 0.1 arc-sec units
    if tenths >= 36000 {
        int += 1;
        tenths -= 36000;
    }
    let minutes = tenths / 600;
    let seconds = (tenths % 600) / 10;
    let sec_frac = tenths % 10;
    if zero {
        format!("{}{:02}:{:02}:{:02}.{}", sign, int, minutes, seconds, sec_frac)
    } else {
        format!("{}{}:{:02}:{:02}.{}", sign, int, minutes, seconds, sec_frac)
    }
}

#[test]
fn test_value_to_sexagesimal() {
    assert_eq!(value_to_sexagesimal(10.5, true), "10:30:00.0");
    assert_eq!(value_to_sexagesimal(-1.0, true), "-01:00:00.0");
    assert_eq!(value_to_sexagesimal(5.25, false), "5:15:00.0");
    assert_eq!(value_to_sexagesimal(0.99999999, true), "01:00:00.0");
}

/// Parses `[+-]D:M[:S[.s]]`, `[+-]D M S` or a plain decimal number.
pub fn sexagesimal_to_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = text.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    // -00:00:00.00 or -00 00 00.00, seconds optional
    static RE: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE.get_or_init(|| {
        regex::Regex::new(r"^([+-]?)(\d+)[:\s](\d+(?:\.\d+)?)(?:[:\s](\d+(?:\.\d+)?))?$").unwrap()
    });
    let res = re.captures(text)?;
    let is_neg = &res[1] == "-";
    let int = res[2].parse::<f64>().ok()?;
    let minutes = res[3].parse::<f64>().ok()?;
    let seconds = match res.get(4) {
        Some(sec) => sec.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    let value = int + minutes / 60.0 + seconds / 3600.0;
    Some(if !is_neg { value } else { -value })
}

#[test]
fn test_sexagesimal_to_value() {
    assert!(sexagesimal_to_value("").is_none());
    assert!(sexagesimal_to_value("abc").is_none());
    assert!(sexagesimal_to_value("10:75").is_none());
    assert!(sexagesimal_to_value("nan").is_none());
    assert_eq!(sexagesimal_to_value("1:00"), Some(1.0));
    assert_eq!(sexagesimal_to_value("-1:00"), Some(-1.0));
    assert_eq!(sexagesimal_to_value("10:30"), Some(10.5));
    assert_eq!(sexagesimal_to_value("10:30:00"), Some(10.5));
    assert_eq!(sexagesimal_to_value("-10 30 00"), Some(-10.5));
    assert_eq!(sexagesimal_to_value("55.75"), Some(55.75));
    let value = sexagesimal_to_value("10:30:30.5").unwrap();
    assert!(f64::abs(value - (10.5 + 30.5 / 3600.0)) < 1e-12);
}

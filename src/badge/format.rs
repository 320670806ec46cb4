//! Message and color helpers shared by the badge kinds

use semver::Version;

const METRIC_PREFIXES: [&str; 8] = ["k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Formats a count with a metric suffix: 999, 1.2k, 15k, 2.5M
pub fn metric(count: f64) -> String {
    let count = count.max(0.0).round();

    for (i, prefix) in METRIC_PREFIXES.iter().enumerate().rev() {
        let limit = 1000f64.powi(i as i32 + 1);
        if count >= limit {
            let text = scaled_text(count / limit);
            // 999.5k rounds to 1000k, which reads as 1M
            if text == "1000" {
                if let Some(next) = METRIC_PREFIXES.get(i + 1) {
                    return format!("1{}", next);
                }
            }
            return format!("{}{}", text, prefix);
        }
    }

    format!("{:.0}", count)
}

fn scaled_text(scaled: f64) -> String {
    if scaled < 10.0 {
        format!("{:.1}", scaled).trim_end_matches(".0").to_string()
    } else {
        format!("{:.0}", scaled)
    }
}

/// Prefixes plain numeric versions with `v`
pub fn add_v(version: &str) -> String {
    if version.starts_with(|c: char| c.is_ascii_digit()) {
        format!("v{}", version)
    } else {
        version.to_string()
    }
}

/// Pre-releases and 0.x versions are orange, everything else blue
pub fn version_color(version: &str) -> &'static str {
    let stripped = version.strip_prefix('v').unwrap_or(version);
    match Version::parse(stripped) {
        Ok(parsed) if !parsed.pre.is_empty() || parsed.major == 0 => "orange",
        Ok(_) => "blue",
        Err(_) if stripped.contains('-') || stripped.starts_with("0.") => "orange",
        Err(_) => "blue",
    }
}

pub fn rating_color(rating: f64) -> &'static str {
    if rating < 2.0 {
        "red"
    } else if rating < 3.0 {
        "yellow"
    } else if rating < 4.0 {
        "yellowgreen"
    } else {
        "brightgreen"
    }
}

pub fn age_color(age_days: i64) -> &'static str {
    match age_days {
        ..=30 => "brightgreen",
        31..=180 => "green",
        181..=365 => "yellowgreen",
        366..=730 => "yellow",
        _ => "orange",
    }
}

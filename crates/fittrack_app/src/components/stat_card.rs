use std::fmt::Display;

pub fn stat_card(title: &str, value: impl Display, description: Option<&str>) -> String {
    match description {
        Some(d) => format!("{title}: {value}\n  {d}\n"),
        None => format!("{title}: {value}\n"),
    }
}

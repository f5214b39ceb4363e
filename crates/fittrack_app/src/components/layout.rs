//! Page chrome: header with the navigation menu, and the footer.

use fittrack_client::User;

pub const APP_TITLE: &str = "Fitness Tracker";

/// Menu entries shown to a signed-in user, as (label, path).
pub const MENU_ITEMS: [(&str, &str); 4] = [
    ("Dashboard", "/"),
    ("Workouts", "/workouts"),
    ("Exercise Library", "/exercises"),
    ("Profile", "/profile"),
];

pub fn header(user: Option<&User>) -> String {
    let mut items: Vec<String> = Vec::new();
    match user {
        Some(_) => {
            items.extend(
                MENU_ITEMS
                    .iter()
                    .map(|(label, path)| format!("{label} ({path})")),
            );
            items.push("Logout".to_string());
        }
        None => {
            items.push("Login (/login)".to_string());
            items.push("Register (/register)".to_string());
        }
    }
    let rule = "=".repeat(60);
    format!("{rule}\n{APP_TITLE} | {}\n{rule}\n", items.join(" | "))
}

pub fn footer(year: i32) -> String {
    format!("{}\nFitness Workout Tracker - {year}\n", "-".repeat(60))
}

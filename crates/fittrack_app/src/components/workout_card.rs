use fittrack_client::Workout;
use fittrack_client::utils::display_date;

/// Summary card for one workout, with links to its detail and edit pages.
pub fn workout_card(workout: &Workout) -> String {
    let mut out = format!("* {}\n", workout.name);
    if let Some(date) = workout.date.as_deref() {
        out.push_str(&format!("  {}\n", display_date(date)));
    }
    if let Some(minutes) = workout.duration.filter(|m| *m > 0) {
        out.push_str(&format!("  {minutes} minutes\n"));
    }
    if let Some(notes) = workout.notes.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("  {notes}\n"));
    }
    if let Some(id) = workout.id.as_deref() {
        out.push_str(&format!(
            "  View Details: /workouts/{id}  Edit: /workouts/edit/{id}\n"
        ));
    }
    out
}

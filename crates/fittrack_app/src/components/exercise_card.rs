use fittrack_client::Exercise;

pub fn exercise_card(exercise: &Exercise) -> String {
    let mut out = format!("* {}", exercise.name);
    if let Some(category) = exercise.category.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!(" [{category}]"));
    }
    if let Some(group) = exercise.muscle_group.as_deref().filter(|g| !g.is_empty()) {
        out.push_str(&format!(" ({group})"));
    }
    out.push('\n');
    if let Some(description) = exercise.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("  {description}\n"));
    }
    out
}

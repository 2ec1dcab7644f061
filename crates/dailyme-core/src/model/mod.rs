//! Input records consumed by the insight engine.

mod mood;
mod task;
pub mod time;

pub use mood::{Mood, MoodEntry};
pub use task::{DateField, Task, TaskType};

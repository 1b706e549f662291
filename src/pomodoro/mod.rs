pub mod pomodoro;
pub mod session;

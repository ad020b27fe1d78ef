// Discord commands module.
// Each feature gets its own command file.

pub mod markov;

// Bot presence management
pub mod presence;

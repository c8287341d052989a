//! Cosmetic text requested by the simulation
//!
//! Nothing here affects gameplay. The core asks for a line, logs it and
//! attaches it to floating text.

/// Source of cosmetic strings
pub trait FlavorText: Send {
    /// One-liner when the manager steps in
    fn manager_line(&mut self) -> String;
    /// Remark when a customer storms out
    fn unhappy_line(&mut self) -> String;
}

const MANAGER_LINES: &[&str] = &[
    "I'll handle this myself.",
    "Why is nobody on the line?",
    "Minions, assemble!",
    "Order up, people!",
    "Do I have to do everything?",
];

const UNHAPPY_LINES: &[&str] = &[
    "I've waited long enough!",
    "Never coming back.",
    "One star.",
    "Is the chef asleep?",
];

/// Built-in table; hands out lines in rotation
#[derive(Debug, Clone, Default)]
pub struct DefaultFlavor {
    manager_next: usize,
    unhappy_next: usize,
}

impl DefaultFlavor {
    pub fn new() -> Self {
        Self::default()
    }
}

fn rotate(table: &[&str], next: &mut usize) -> String {
    let line = table[*next % table.len()];
    *next = next.wrapping_add(1);
    line.to_string()
}

impl FlavorText for DefaultFlavor {
    fn manager_line(&mut self) -> String {
        rotate(MANAGER_LINES, &mut self.manager_next)
    }

    fn unhappy_line(&mut self) -> String {
        rotate(UNHAPPY_LINES, &mut self.unhappy_next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_rotate() {
        let mut flavor = DefaultFlavor::new();
        let first = flavor.manager_line();
        for _ in 1..MANAGER_LINES.len() {
            flavor.manager_line();
        }
        assert_eq!(flavor.manager_line(), first, "table wraps around");
        assert!(!flavor.unhappy_line().is_empty());
    }
}

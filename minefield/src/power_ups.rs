//! One-time power-ups available to the player.
use enumflags2::BitFlags;

/// A power-up the player may spend once per game.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum PowerUp {
    /// Shows every mine on the next render only.
    Hint = 0b01,
    /// Absorbs the next mine the player uncovers.
    Shield = 0b10,
}

impl PowerUp {
    /// Map a single-letter command to its power-up, ignoring case. `h` is the hint and `s`
    /// the shield.
    pub fn from_command(command: char) -> Option<Self> {
        match command.to_ascii_lowercase() {
            'h' => Some(PowerUp::Hint),
            's' => Some(PowerUp::Shield),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(PowerUp::from_command('h'), Some(PowerUp::Hint));
        assert_eq!(PowerUp::from_command('H'), Some(PowerUp::Hint));
        assert_eq!(PowerUp::from_command('s'), Some(PowerUp::Shield));
        assert_eq!(PowerUp::from_command('S'), Some(PowerUp::Shield));
        assert_eq!(PowerUp::from_command('x'), None);
        assert_eq!(PowerUp::from_command('1'), None);
    }
}

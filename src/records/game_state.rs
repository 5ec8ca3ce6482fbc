//! Game state and weather.

use super::CategoryRecord;
use crate::catalog::tables;
use crate::types::{Header, LayoutDescriptor, PacketCategory};

wire_record! {
    /// Game state packet.
    pub struct GameState {
        pub header: Header,
        pub build_version_number: u16,
        /// Game state in the low 3 bits, session state in the high nibble
        pub game_state: u8,
        pub ambient_temperature: i8,
        pub track_temperature: i8,
        pub rain_density: u8,
        pub snow_density: u8,
        pub wind_speed: i8,
        pub wind_direction_x: i8,
        pub wind_direction_y: i8,
    }
}

impl GameState {
    /// Game state code from the low 3 bits.
    pub fn game_state(&self) -> u8 {
        self.game_state & 0x07
    }

    /// Session state code from the high nibble.
    pub fn session_state(&self) -> u8 {
        self.game_state >> 4
    }
}

impl CategoryRecord for GameState {
    const CATEGORY: PacketCategory = PacketCategory::GameState;

    fn layout() -> &'static LayoutDescriptor {
        &tables::GAME_STATE
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_bits_unpack() {
        let mut packet = vec![0u8; tables::GAME_STATE.length];
        packet[14] = 0x52;
        packet[15] = (-4i8) as u8;

        let state = GameState::decode_bytes(&packet).unwrap();
        assert_eq!(state.game_state(), 2);
        assert_eq!(state.session_state(), 5);
        assert_eq!(state.game_state, 0x52);
        assert_eq!(state.ambient_temperature, -4);
    }

    #[test]
    fn zeroed_packet_is_a_valid_reading() {
        let state = GameState::decode_bytes(&[0u8; 22]).unwrap();
        assert_eq!(state.build_version_number, 0);
        assert_eq!(state.rain_density, 0);
    }
}

//! Car physics: the telemetry of the viewed participant's car.

use super::CategoryRecord;
use crate::catalog::tables::{self, TYRE_NAME_LENGTH_MAX};
use crate::types::{FixedText, Header, LayoutDescriptor, PacketCategory};

/// Gear value reported for reverse.
pub const REVERSE_GEAR: i8 = -1;

const GEAR_REVERSE_CODE: u8 = 15;

wire_record! {
    /// Car physics packet. Wheel arrays are ordered front-left, front-right,
    /// rear-left, rear-right; vectors are x, y, z.
    pub struct CarPhysics {
        pub header: Header,
        pub viewed_participant_index: i8,
        pub unfiltered_throttle: u8,
        pub unfiltered_brake: u8,
        pub unfiltered_steering: i8,
        pub unfiltered_clutch: u8,
        pub car_flags: u8,
        pub oil_temp_celsius: i16,
        pub oil_pressure_kpa: u16,
        pub water_temp_celsius: i16,
        pub water_pressure_kpa: u16,
        pub fuel_pressure_kpa: u16,
        pub fuel_capacity: u8,
        pub brake: u8,
        pub throttle: u8,
        pub clutch: u8,
        pub fuel_level: f32,
        pub speed: f32,
        pub rpm: u16,
        pub max_rpm: u16,
        pub steering: i8,
        /// Gear in the low nibble, number of gears in the high nibble
        pub gear_num_gears: u8,
        pub boost_amount: u8,
        pub crash_state: u8,
        pub odometer_km: f32,
        pub orientation: [f32; 3],
        pub local_velocity: [f32; 3],
        pub world_velocity: [f32; 3],
        pub angular_velocity: [f32; 3],
        pub local_acceleration: [f32; 3],
        pub world_acceleration: [f32; 3],
        pub extents_centre: [f32; 3],
        pub tyre_flags: [u8; 4],
        pub terrain: [u8; 4],
        pub tyre_y: [f32; 4],
        pub tyre_rps: [f32; 4],
        pub tyre_temp: [u8; 4],
        pub tyre_height_above_ground: [f32; 4],
        pub tyre_wear: [u8; 4],
        pub brake_damage: [u8; 4],
        pub suspension_damage: [u8; 4],
        pub brake_temp_celsius: [i16; 4],
        pub tyre_tread_temp: [u16; 4],
        pub tyre_layer_temp: [u16; 4],
        pub tyre_carcass_temp: [u16; 4],
        pub tyre_rim_temp: [u16; 4],
        pub tyre_internal_air_temp: [u16; 4],
        pub tyre_temp_left: [u16; 4],
        pub tyre_temp_center: [u16; 4],
        pub tyre_temp_right: [u16; 4],
        pub wheel_local_position_y: [f32; 4],
        pub ride_height: [f32; 4],
        pub suspension_travel: [f32; 4],
        pub suspension_velocity: [f32; 4],
        pub suspension_ride_height: [u16; 4],
        pub air_pressure: [u16; 4],
        pub engine_speed: f32,
        pub engine_torque: f32,
        pub wings: [u8; 2],
        pub hand_brake: u8,
        pub aero_damage: u8,
        pub engine_damage: u8,
        pub joy_pad: u32,
        pub d_pad: u8,
        pub tyre_compound: [FixedText<TYRE_NAME_LENGTH_MAX>; 4],
        pub turbo_boost_pressure: f32,
        pub full_position: [f32; 3],
        pub brake_bias: u8,
        pub tick_count: u32,
    }
}

impl CarPhysics {
    /// Current gear from the low nibble; reverse is [`REVERSE_GEAR`].
    pub fn gear(&self) -> i8 {
        match self.gear_num_gears & 0x0F {
            GEAR_REVERSE_CODE => REVERSE_GEAR,
            gear => gear as i8,
        }
    }

    /// Number of forward gears from the high nibble.
    pub fn num_gears(&self) -> u8 {
        self.gear_num_gears >> 4
    }
}

impl CategoryRecord for CarPhysics {
    const CATEGORY: PacketCategory = PacketCategory::CarPhysics;

    fn layout() -> &'static LayoutDescriptor {
        &tables::CAR_PHYSICS
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

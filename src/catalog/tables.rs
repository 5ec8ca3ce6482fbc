//! Field plans for every cataloged layout
//!
//! Field order and widths follow the game's packed C structures exactly;
//! offsets are assigned by [`place`] starting after the common header.

use crate::types::{
    FieldLayout as F, FieldType::*, HEADER_SIZE, LayoutDescriptor, PacketCategory, RecordLayout,
    packet_type, place,
};

pub const TYRE_NAME_LENGTH_MAX: usize = 40;
pub const PARTICIPANT_NAME_LENGTH_MAX: usize = 64;
pub const PARTICIPANTS_PER_PACKET: usize = 16;
pub const STREAMER_PARTICIPANTS_SUPPORTED: usize = 32;
pub const TRACK_NAME_LENGTH_MAX: usize = 64;
pub const VEHICLE_NAME_LENGTH_MAX: usize = 64;
pub const CLASS_NAME_LENGTH_MAX: usize = 20;
pub const VEHICLES_PER_PACKET: usize = 16;
pub const CLASSES_SUPPORTED_PER_PACKET: usize = 60;

pub const CAR_PHYSICS_VERSION: u8 = 4;
pub const RACE_DEFINITION_VERSION: u8 = 1;
pub const PARTICIPANTS_VERSION: u8 = 2;
pub const TIMINGS_VERSION: u8 = 2;
pub const GAME_STATE_VERSION: u8 = 2;
pub const TIME_STATS_VERSION: u8 = 2;
pub const PARTICIPANT_VEHICLE_NAMES_VERSION: u8 = 2;
pub const VEHICLE_CLASS_NAMES_VERSION: u8 = 2;

const CAR_PHYSICS_FIELDS: &[F] = &place(
    [
        F::scalar("viewed_participant_index", Int8),
        F::scalar("unfiltered_throttle", UInt8),
        F::scalar("unfiltered_brake", UInt8),
        F::scalar("unfiltered_steering", Int8),
        F::scalar("unfiltered_clutch", UInt8),
        F::scalar("car_flags", UInt8),
        F::scalar("oil_temp_celsius", Int16),
        F::scalar("oil_pressure_kpa", UInt16),
        F::scalar("water_temp_celsius", Int16),
        F::scalar("water_pressure_kpa", UInt16),
        F::scalar("fuel_pressure_kpa", UInt16),
        F::scalar("fuel_capacity", UInt8),
        F::scalar("brake", UInt8),
        F::scalar("throttle", UInt8),
        F::scalar("clutch", UInt8),
        F::scalar("fuel_level", Float32),
        F::scalar("speed", Float32),
        F::scalar("rpm", UInt16),
        F::scalar("max_rpm", UInt16),
        F::scalar("steering", Int8),
        F::scalar("gear_num_gears", UInt8),
        F::scalar("boost_amount", UInt8),
        F::scalar("crash_state", UInt8),
        F::scalar("odometer_km", Float32),
        F::array("orientation", Float32, 3),
        F::array("local_velocity", Float32, 3),
        F::array("world_velocity", Float32, 3),
        F::array("angular_velocity", Float32, 3),
        F::array("local_acceleration", Float32, 3),
        F::array("world_acceleration", Float32, 3),
        F::array("extents_centre", Float32, 3),
        F::array("tyre_flags", UInt8, 4),
        F::array("terrain", UInt8, 4),
        F::array("tyre_y", Float32, 4),
        F::array("tyre_rps", Float32, 4),
        F::array("tyre_temp", UInt8, 4),
        F::array("tyre_height_above_ground", Float32, 4),
        F::array("tyre_wear", UInt8, 4),
        F::array("brake_damage", UInt8, 4),
        F::array("suspension_damage", UInt8, 4),
        F::array("brake_temp_celsius", Int16, 4),
        F::array("tyre_tread_temp", UInt16, 4),
        F::array("tyre_layer_temp", UInt16, 4),
        F::array("tyre_carcass_temp", UInt16, 4),
        F::array("tyre_rim_temp", UInt16, 4),
        F::array("tyre_internal_air_temp", UInt16, 4),
        F::array("tyre_temp_left", UInt16, 4),
        F::array("tyre_temp_center", UInt16, 4),
        F::array("tyre_temp_right", UInt16, 4),
        F::array("wheel_local_position_y", Float32, 4),
        F::array("ride_height", Float32, 4),
        F::array("suspension_travel", Float32, 4),
        F::array("suspension_velocity", Float32, 4),
        F::array("suspension_ride_height", UInt16, 4),
        F::array("air_pressure", UInt16, 4),
        F::scalar("engine_speed", Float32),
        F::scalar("engine_torque", Float32),
        F::array("wings", UInt8, 2),
        F::scalar("hand_brake", UInt8),
        F::scalar("aero_damage", UInt8),
        F::scalar("engine_damage", UInt8),
        F::scalar("joy_pad", UInt32),
        F::scalar("d_pad", UInt8),
        F::array("tyre_compound", Text(TYRE_NAME_LENGTH_MAX), 4),
        F::scalar("turbo_boost_pressure", Float32),
        F::array("full_position", Float32, 3),
        F::scalar("brake_bias", UInt8),
        F::scalar("tick_count", UInt32),
    ],
    HEADER_SIZE,
);

const RACE_DEFINITION_FIELDS: &[F] = &place(
    [
        F::scalar("world_fastest_lap_time", Float32),
        F::scalar("personal_fastest_lap_time", Float32),
        F::scalar("personal_fastest_sector1_time", Float32),
        F::scalar("personal_fastest_sector2_time", Float32),
        F::scalar("personal_fastest_sector3_time", Float32),
        F::scalar("world_fastest_sector1_time", Float32),
        F::scalar("world_fastest_sector2_time", Float32),
        F::scalar("world_fastest_sector3_time", Float32),
        F::scalar("track_length", Float32),
        F::scalar("track_location", Text(TRACK_NAME_LENGTH_MAX)),
        F::scalar("track_variation", Text(TRACK_NAME_LENGTH_MAX)),
        F::scalar("translated_track_location", Text(TRACK_NAME_LENGTH_MAX)),
        F::scalar("translated_track_variation", Text(TRACK_NAME_LENGTH_MAX)),
        F::scalar("laps_time_in_event", UInt16),
        F::scalar("enforced_pit_stop_lap", Int8),
    ],
    HEADER_SIZE,
);

const PARTICIPANTS_FIELDS: &[F] = &place(
    [
        F::scalar("participants_changed_timestamp", UInt32),
        F::array("name", Text(PARTICIPANT_NAME_LENGTH_MAX), PARTICIPANTS_PER_PACKET),
        F::array("nationality", UInt32, PARTICIPANTS_PER_PACKET),
        F::array("index", UInt16, PARTICIPANTS_PER_PACKET),
    ],
    HEADER_SIZE,
);

const PARTICIPANT_INFO_FIELDS: &[F] = &place(
    [
        F::array("world_position", Int16, 3),
        F::array("orientation", Int16, 3),
        F::scalar("current_lap_distance", UInt16),
        F::scalar("race_position", UInt8),
        F::scalar("sector", UInt8),
        F::scalar("highest_flag", UInt8),
        F::scalar("pit_mode_schedule", UInt8),
        F::scalar("car_index", UInt16),
        F::scalar("race_state", UInt8),
        F::scalar("current_lap", UInt8),
        F::scalar("current_time", Float32),
        F::scalar("current_sector_time", Float32),
        F::scalar("participant_index", UInt16),
    ],
    0,
);

/// Per-participant entry of the timings packet.
pub const PARTICIPANT_INFO: RecordLayout =
    RecordLayout::new("ParticipantInfo", PARTICIPANT_INFO_FIELDS);

const TIMINGS_FIELDS: &[F] = &place(
    [
        F::scalar("num_participants", Int8),
        F::scalar("participants_changed_timestamp", UInt32),
        F::scalar("event_time_remaining", Float32),
        F::scalar("split_time_ahead", Float32),
        F::scalar("split_time_behind", Float32),
        F::scalar("split_time", Float32),
        F::array("participants", Record(&PARTICIPANT_INFO), STREAMER_PARTICIPANTS_SUPPORTED),
        F::scalar("local_participant_index", UInt16),
        F::scalar("tick_count", UInt32),
    ],
    HEADER_SIZE,
);

const GAME_STATE_FIELDS: &[F] = &place(
    [
        F::scalar("build_version_number", UInt16),
        F::scalar("game_state", UInt8),
        F::scalar("ambient_temperature", Int8),
        F::scalar("track_temperature", Int8),
        F::scalar("rain_density", UInt8),
        F::scalar("snow_density", UInt8),
        F::scalar("wind_speed", Int8),
        F::scalar("wind_direction_x", Int8),
        F::scalar("wind_direction_y", Int8),
    ],
    HEADER_SIZE,
);

const PARTICIPANT_STATS_INFO_FIELDS: &[F] = &place(
    [
        F::scalar("fastest_lap_time", Float32),
        F::scalar("last_lap_time", Float32),
        F::scalar("last_sector_time", Float32),
        F::scalar("fastest_sector1_time", Float32),
        F::scalar("fastest_sector2_time", Float32),
        F::scalar("fastest_sector3_time", Float32),
        F::scalar("participant_online_rep", UInt32),
        F::scalar("participant_index", UInt16),
    ],
    0,
);

/// Per-participant entry of the time stats packet.
pub const PARTICIPANT_STATS_INFO: RecordLayout =
    RecordLayout::new("ParticipantStatsInfo", PARTICIPANT_STATS_INFO_FIELDS);

const TIME_STATS_FIELDS: &[F] = &place(
    [
        F::scalar("participants_changed_timestamp", UInt32),
        F::array("stats", Record(&PARTICIPANT_STATS_INFO), STREAMER_PARTICIPANTS_SUPPORTED),
    ],
    HEADER_SIZE,
);

const VEHICLE_INFO_FIELDS: &[F] = &place(
    [
        F::scalar("index", UInt16),
        F::scalar("class", UInt32),
        F::scalar("name", Text(VEHICLE_NAME_LENGTH_MAX)),
    ],
    0,
);

/// Per-vehicle entry of the participant vehicle names packet.
pub const VEHICLE_INFO: RecordLayout = RecordLayout::new("VehicleInfo", VEHICLE_INFO_FIELDS);

const PARTICIPANT_VEHICLE_NAMES_FIELDS: &[F] = &place(
    [F::array("vehicles", Record(&VEHICLE_INFO), VEHICLES_PER_PACKET)],
    HEADER_SIZE,
);

const CLASS_INFO_FIELDS: &[F] = &place(
    [F::scalar("class_index", UInt32), F::scalar("name", Text(CLASS_NAME_LENGTH_MAX))],
    0,
);

/// Per-class entry of the vehicle class names packet.
pub const CLASS_INFO: RecordLayout = RecordLayout::new("ClassInfo", CLASS_INFO_FIELDS);

const VEHICLE_CLASS_NAMES_FIELDS: &[F] = &place(
    [F::array("classes", Record(&CLASS_INFO), CLASSES_SUPPORTED_PER_PACKET)],
    HEADER_SIZE,
);

pub static CAR_PHYSICS: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::CarPhysics,
    packet_type::CAR_PHYSICS,
    CAR_PHYSICS_VERSION,
    CAR_PHYSICS_FIELDS,
);

pub static RACE_DEFINITION: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::RaceDefinition,
    packet_type::RACE_DEFINITION,
    RACE_DEFINITION_VERSION,
    RACE_DEFINITION_FIELDS,
);

pub static PARTICIPANTS: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::Participants,
    packet_type::PARTICIPANTS,
    PARTICIPANTS_VERSION,
    PARTICIPANTS_FIELDS,
);

pub static TIMINGS: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::Timings,
    packet_type::TIMINGS,
    TIMINGS_VERSION,
    TIMINGS_FIELDS,
);

pub static GAME_STATE: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::GameState,
    packet_type::GAME_STATE,
    GAME_STATE_VERSION,
    GAME_STATE_FIELDS,
);

pub static TIME_STATS: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::TimeStats,
    packet_type::TIME_STATS,
    TIME_STATS_VERSION,
    TIME_STATS_FIELDS,
);

pub static PARTICIPANT_VEHICLE_NAMES: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::ParticipantVehicleNames,
    packet_type::PARTICIPANT_VEHICLE_NAMES,
    PARTICIPANT_VEHICLE_NAMES_VERSION,
    PARTICIPANT_VEHICLE_NAMES_FIELDS,
);

pub static VEHICLE_CLASS_NAMES: LayoutDescriptor = LayoutDescriptor::new(
    PacketCategory::VehicleClassNames,
    packet_type::PARTICIPANT_VEHICLE_NAMES,
    VEHICLE_CLASS_NAMES_VERSION,
    VEHICLE_CLASS_NAMES_FIELDS,
);

/// Every cataloged layout. Entries sharing a (type, version) pair are listed
/// primary first.
pub static ALL_LAYOUTS: [&LayoutDescriptor; 8] = [
    &CAR_PHYSICS,
    &RACE_DEFINITION,
    &PARTICIPANTS,
    &TIMINGS,
    &GAME_STATE,
    &TIME_STATS,
    &PARTICIPANT_VEHICLE_NAMES,
    &VEHICLE_CLASS_NAMES,
];

// Published datagram sizes for each layout.
const _: () = assert!(CAR_PHYSICS_FIELDS[CAR_PHYSICS_FIELDS.len() - 1].end() == 559);
const _: () = assert!(RACE_DEFINITION_FIELDS[RACE_DEFINITION_FIELDS.len() - 1].end() == 307);
const _: () = assert!(PARTICIPANTS_FIELDS[PARTICIPANTS_FIELDS.len() - 1].end() == 1136);
const _: () = assert!(PARTICIPANT_INFO.size == 32);
const _: () = assert!(TIMINGS_FIELDS[TIMINGS_FIELDS.len() - 1].end() == 1063);
const _: () = assert!(GAME_STATE_FIELDS[GAME_STATE_FIELDS.len() - 1].end() == 22);
const _: () = assert!(PARTICIPANT_STATS_INFO.size == 30);
const _: () = assert!(TIME_STATS_FIELDS[TIME_STATS_FIELDS.len() - 1].end() == 976);
const _: () = assert!(VEHICLE_INFO.size == 70);
const _: () = assert!(CLASS_INFO.size == 24);
const _: () = assert!(
    PARTICIPANT_VEHICLE_NAMES_FIELDS[PARTICIPANT_VEHICLE_NAMES_FIELDS.len() - 1].end() == 1132
);
const _: () =
    assert!(VEHICLE_CLASS_NAMES_FIELDS[VEHICLE_CLASS_NAMES_FIELDS.len() - 1].end() == 1452);

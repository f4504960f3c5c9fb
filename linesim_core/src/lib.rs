#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Perception and control core of the line-follower simulator.
//!
//! Nothing here knows how the world is stored or drawn. Track geometry comes
//! in through `linesim_traits::TileProvider`, robot state through
//! [`Telemetry`], and controllers answer with a [`MotionCommand`].
//!
//! ## Architecture
//!
//! - **FSM**: generic state manager with transition callbacks (`fsm` module)
//! - **Sensor**: analytic circle/line-band overlap, ring-buffer smoothing,
//!   optional Schmitt trigger (`sensor` module)
//! - **Sensor array**: rigid body-frame layout posed in the world
//!   (`sensor_array` module)
//! - **Controller**: PD tracking, junction scanning, gap recovery
//!   (`controller` module)
//!
//! ## Conventions
//!
//! Brightness is in `[0, 1]`, 1 being white. Bearings are radians; the body
//! frame looks along +y, and a positive rotation rate turns towards -x.

pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod fsm;
pub mod sensor;
pub mod sensor_array;
pub mod telemetry;

pub use controller::{LineFollow, ThreeSensorFollow};
pub use error::{BuildError, Report, Result};
pub use fsm::{ControlState, Manager, Step};
pub use sensor::{LightSensor, Overlap, SensorKind};
pub use sensor_array::{SensorArray, SensorArrayBuilder};
pub use telemetry::{MotionCommand, Telemetry};

//! Teams domain layer: entities, invite codes, admission state machine, validation

pub mod entities;
pub mod error;
pub mod invite_code;
pub mod state;
pub mod validation;

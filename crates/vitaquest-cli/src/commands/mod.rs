pub mod goal;
pub mod meal;
pub mod plan;
pub mod reset;
pub mod status;
pub mod xp;

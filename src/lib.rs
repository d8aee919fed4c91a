#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Library;
#[allow(non_snake_case)]
pub mod ReactorCSTR;
pub mod cli;

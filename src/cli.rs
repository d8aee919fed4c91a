/// Interactive terminal front end: main menu and CSTR submenus
pub mod cli_cstr;
pub mod cli_main;

pub mod quake;

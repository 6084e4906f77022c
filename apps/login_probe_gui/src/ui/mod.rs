//! UI layer for the login probe: app shell and the single probe page.

pub mod app;

pub use app::LoginProbeApp;

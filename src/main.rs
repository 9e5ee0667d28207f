mod app;
mod model;
mod services;
mod store;
mod theme;
mod ui;
mod validator;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    ui::run()
}

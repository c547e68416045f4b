use std::cell::RefCell;

use dragon_bundle::{AppContext, Bundle, BundleKey, Dependencies, Qualifier};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DatabaseSection {
    host: String,
    port: u16,
    name: String,
    replicas: Vec<Replica>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Replica {
    host: String,
    port: u16,
}

#[derive(Debug, Default)]
struct Database {
    url: RefCell<String>,
}

impl Bundle for Database {
    fn apply(&self, ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
        let section: DatabaseSection = ctx.extract("database")?;
        let url = format!("postgres://{}:{}/{}", section.host, section.port, section.name);
        ctx.register_value("database.url", url.as_str())?;
        *self.url.borrow_mut() = url;
        ctx.register_bundle(Migrations, Qualifier::None)
    }
}

#[derive(Debug)]
struct Migrations;

impl Bundle for Migrations {
    fn apply(&self, ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
        ctx.register_value("migrations.applied", 3)?;
        Ok(())
    }
}

#[derive(Debug)]
struct Api;

impl Bundle for Api {
    fn apply(&self, ctx: &mut AppContext, deps: &Dependencies) -> dragon_bundle::Result<()> {
        let db = deps.require::<Database>()?;
        let name = ctx.get_value("app.name")?.as_string()?;
        println!("{name}: api wired to {}", db.url.borrow());
        Ok(())
    }

    fn requires(&self) -> Vec<BundleKey> {
        vec![BundleKey::of::<Database>()]
    }
}

fn main() -> Result<(), dragon_bundle::Error> {
    let mut ctx = AppContext::builder()
        .with_file("demos/app.toml", true)
        .with_env("DRAGON", "__")
        .build()?;

    ctx.register_bundle(Database::default(), Qualifier::None)?;
    ctx.register_bundle(Api, Qualifier::None)?;

    for provided in ctx.provided_by::<Database>(Qualifier::None)? {
        println!("database provided {}", provided.key());
    }
    println!(
        "migrations applied: {}",
        ctx.get_value("migrations.applied")?.as_number()?
    );

    Ok(())
}

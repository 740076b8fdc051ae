use std::env;
use std::path::PathBuf;

use datalchemy_fixtures::{
    BuiltIn, EntityType, Factory, FactoryOptions, KeyBinding, Registry, Target, Value,
    init_tracing,
};

const USER: EntityType = EntityType::new("User");
const PHOTO: EntityType = EntityType::new("Photo");

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .entity(USER)
        .relation("id", || Target::one(BuiltIn::AutoIncrement))
        .field("name", |f| Value::Text(f.full_name()))
        .field("email", |f| Value::Text(f.email()))
        .bound_relation("photos", || Target::many(PHOTO), KeyBinding::new("id", "userId"));
    registry
        .entity(PHOTO)
        .relation("id", || Target::one(BuiltIn::AutoIncrement))
        .relation("uploadedAt", || Target::one(BuiltIn::Date))
        .field("url", |f| Value::Text(f.url()));
    registry
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info")?;

    let mut args = env::args().skip(1);
    let mut options_path: Option<PathBuf> = None;
    let mut users: i64 = 2;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => options_path = args.next().map(PathBuf::from),
            "--users" => {
                users = args.next().ok_or("missing --users value")?.parse()?;
            }
            _ => return Err(format!("unexpected argument {arg}").into()),
        }
    }

    let options = match options_path {
        Some(path) => FactoryOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => FactoryOptions::default(),
    };

    let mut factory = Factory::with_options(registry(), &options)?;
    let fixtures = factory
        .many(USER)
        .with_amount(3, "photos")?
        .without("email")
        .make(Some(users))?;

    let json = Value::List(fixtures).to_json()?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

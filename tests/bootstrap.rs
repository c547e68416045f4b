use std::cell::Cell;
use std::io::Write;

use dragon_bundle::source::{FileSource, JsonSource};
use dragon_bundle::{
    AppContext, Bundle, BundleKey, Dependencies, ErrorKind, Number, Qualifier, ValueSource,
};
use serde::Deserialize;
use tempfile::Builder;

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    host: String,
    ports: Vec<u16>,
}

/// Loads its configuration from a JSON document during apply.
#[derive(Debug)]
struct ConfigBundle {
    document: &'static str,
}

impl Bundle for ConfigBundle {
    fn apply(&self, ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
        JsonSource::parse(self.document)?.read_into(ctx)
    }
}

#[derive(Debug, Default)]
struct ServerBundle {
    port_count: Cell<usize>,
}

impl Bundle for ServerBundle {
    fn apply(&self, ctx: &mut AppContext, deps: &Dependencies) -> dragon_bundle::Result<()> {
        deps.require::<ConfigBundle>()?;
        let server: Server = ctx.extract("server")?;
        self.port_count.set(server.ports.len());
        ctx.register_value("server.address", format!("{}:{}", server.host, server.ports[0]))?;
        ctx.register_bundle(ListenerBundle, "http")?;
        ctx.register_bundle(ListenerBundle, "https")
    }

    fn requires(&self) -> Vec<BundleKey> {
        vec![BundleKey::of::<ConfigBundle>()]
    }
}

#[derive(Debug)]
struct ListenerBundle;

impl Bundle for ListenerBundle {
    fn apply(&self, _ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
        Ok(())
    }
}

#[test]
fn bundles_populate_and_read_values() {
    let mut ctx = AppContext::new();
    ctx.register_bundle(
        ConfigBundle {
            document: r#"{"server": {"host": "localhost", "ports": [8080, 8443]}}"#,
        },
        Qualifier::None,
    )
    .unwrap();
    ctx.register_bundle(ServerBundle::default(), Qualifier::None).unwrap();

    let server = ctx.get_bundle::<ServerBundle>(Qualifier::None).unwrap();
    assert_eq!(server.port_count.get(), 2);
    assert_eq!(
        ctx.get_value("server.address").unwrap().as_string().unwrap(),
        "localhost:8080"
    );

    let provided = ctx.provided_by::<ServerBundle>(Qualifier::None).unwrap();
    let qualifiers: Vec<_> = provided.iter().map(|b| b.key().qualifier().to_string()).collect();
    assert_eq!(qualifiers, vec!["http", "https"]);

    let http = ctx.get_bundle::<ListenerBundle>("http").unwrap();
    let https = ctx.get_bundle::<ListenerBundle>("https").unwrap();
    assert!(!std::rc::Rc::ptr_eq(&http, &https));
    assert!(ctx.provided_by::<ConfigBundle>(Qualifier::None).unwrap().is_empty());
}

#[test]
fn server_bundle_requires_config_first() {
    let mut ctx = AppContext::new();
    let err = ctx
        .register_bundle(ServerBundle::default(), Qualifier::None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDependency);
    assert!(!ctx.is_bundle_registered::<ServerBundle>(Qualifier::None));
    assert!(ctx.values().is_empty());
}

#[test]
fn json_object_and_array_examples() {
    let mut ctx = AppContext::new();
    JsonSource::parse(r#"{"a": {"a": "foo", "b": 5}}"#)
        .unwrap()
        .read_into(&mut ctx)
        .unwrap();
    assert!(ctx.get_value("a").unwrap().is_object());
    assert_eq!(ctx.get_value("a.a").unwrap().as_string().unwrap(), "foo");
    assert_eq!(ctx.get_value("a.b").unwrap().as_number().unwrap(), Number::Int(5));

    let mut ctx = AppContext::new();
    JsonSource::parse(r#"{"a": ["foo", 5]}"#)
        .unwrap()
        .read_into(&mut ctx)
        .unwrap();
    assert!(ctx.get_value("a").unwrap().is_array());
    assert_eq!(ctx.get_value("a.0").unwrap().as_string().unwrap(), "foo");
    assert_eq!(ctx.get_value("a.1").unwrap().as_number().unwrap(), Number::Int(5));
}

#[test]
fn boolean_in_document_is_unsupported() {
    let mut ctx = AppContext::new();
    let err = JsonSource::parse(r#"{"a": 1, "b": {"enabled": false}}"#)
        .unwrap()
        .read_into(&mut ctx)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn builder_reads_files_from_disk() {
    let mut json = Builder::new().suffix(".json").tempfile().unwrap();
    write!(json, r#"{{"app": {{"name": "demo", "tags": ["x", "y"]}}}}"#).unwrap();

    let mut toml = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(toml, "[limits]\nratio = \"0.75\"").unwrap();

    let ctx = AppContext::builder()
        .with_file(json.path(), true)
        .with_file(toml.path(), true)
        .with_file("/nonexistent/override.json", false)
        .build()
        .unwrap();

    assert_eq!(ctx.get_value("app.tags.1").unwrap().as_string().unwrap(), "y");
    assert_eq!(
        ctx.get_value("limits.ratio").unwrap().as_number().unwrap(),
        Number::Float(0.75)
    );

    let mut late = AppContext::new();
    FileSource::new(json.path(), true).read_into(&mut late).unwrap();
    assert_eq!(late.values().len(), 3);
}

#[test]
fn string_leaf_that_is_not_numeric() {
    let mut ctx = AppContext::new();
    ctx.register_value("name", "dragon").unwrap();
    let err: dragon_bundle::Error = ctx.get_value("name").unwrap().as_number().unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::TypeConversion);
}

#[test]
fn huge_index_from_document_is_an_error() {
    let mut ctx = AppContext::new();
    let err = JsonSource::parse(r#"{"hosts": {"99999999999": "a"}}"#)
        .unwrap()
        .read_into(&mut ctx)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(ctx.get_value("hosts").is_err());
}

#[test]
fn padded_numeric_string() {
    let mut ctx = AppContext::new();
    ctx.register_value("workers", " 8 ").unwrap();
    assert_eq!(ctx.get_value("workers").unwrap().as_number().unwrap(), Number::Int(8));
}

//! End-to-end tests for the transform loader
//!
//! These drive [`TransformLoader`] the way a bundler does: one call per module,
//! many modules in flight at once, with a mock generator factory standing in
//! for the style engine.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use tempfile::TempDir;
use uno_transform::generator::MockGeneratorFactory;
use uno_transform::{
    ConfigError, ConfigLoader, DiagnosticSink, FnTransformer, GeneratorError, Invocation,
    JsonConfigSource, NoOpSink, Phase, StaticConfigSource, TransformFailure, TransformLoader,
    TransformSettings, TransformUnit, TransformerRegistry,
};

const SOURCE: &str =
    r#"export const Button = () => <button className="hover:(bg-red text-white)" />;"#;

#[derive(Default)]
struct CollectingSink {
    failures: Mutex<Vec<TransformFailure>>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, failure: &TransformFailure) {
        self.failures.lock().unwrap().push(failure.clone());
    }
}

/// Expands `hover:(a b)` into `hover:a hover:b`, counting invocations.
fn variant_group(calls: Arc<AtomicUsize>) -> TransformUnit {
    let pattern = regex::Regex::new(r"(\w+):\(([^)]*)\)").unwrap();
    FnTransformer::new(move |buffer, _, ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        buffer.replace_all(&pattern, |caps| {
            caps[2]
                .split_whitespace()
                .map(|token| {
                    let expanded = format!("{}:{}", &caps[1], token);
                    ctx.tokens.insert(expanded.clone());
                    expanded
                })
                .collect::<Vec<_>>()
                .join(" ")
        });
        Ok(())
    })
    .with_name("variant-group")
    .into_unit()
}

fn banner(text: &'static str, phase: Phase) -> TransformUnit {
    FnTransformer::new(move |buffer, _, _| {
        buffer.prepend(text);
        Ok(())
    })
    .with_name(text)
    .with_phase(phase)
    .into_unit()
}

fn loader(
    units: Vec<TransformUnit>,
    factory: Arc<MockGeneratorFactory>,
    sink: Arc<dyn DiagnosticSink>,
) -> TransformLoader {
    TransformLoader::with_sink(
        &TransformSettings::new("/app"),
        ConfigLoader::new(StaticConfigSource::uno(units)),
        factory,
        sink,
    )
}

#[tokio::test]
async fn test_second_transform_is_served_from_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = loader(
        vec![variant_group(calls.clone())],
        Arc::new(MockGeneratorFactory::new()),
        Arc::new(NoOpSink),
    );
    let invocation = Invocation::for_path("/app/src/Button.tsx");

    let first = loader.transform(SOURCE, &invocation).await.unwrap();
    let second = loader.transform(SOURCE, &invocation).await.unwrap();

    assert!(first.contains(r#"className="hover:bg-red hover:text-white""#));
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_output_is_a_valid_input() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = loader(
        vec![variant_group(calls.clone())],
        Arc::new(MockGeneratorFactory::new()),
        Arc::new(NoOpSink),
    );
    let invocation = Invocation::for_path("/app/src/Button.tsx");

    let first = loader.transform(SOURCE, &invocation).await.unwrap();
    assert_ne!(first, SOURCE);

    // already expanded, so a second pass leaves the text alone
    let second = loader.transform(&first, &invocation).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(loader.cache_len(), 2);

    let third = loader.transform(&first, &invocation).await.unwrap();
    assert_eq!(third, first);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_edited_source_misses_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = loader(
        vec![variant_group(calls.clone())],
        Arc::new(MockGeneratorFactory::new()),
        Arc::new(NoOpSink),
    );
    let invocation = Invocation::for_path("/app/src/Button.tsx");

    loader.transform(SOURCE, &invocation).await.unwrap();
    let edited = SOURCE.replace("bg-red", "bg-blue");
    let out = loader.transform(&edited, &invocation).await.unwrap();

    assert!(out.contains("hover:bg-blue"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(loader.cache_len(), 2);
}

#[tokio::test]
async fn test_failing_unit_does_not_stop_later_phases() {
    let sink = Arc::new(CollectingSink::default());
    let broken = FnTransformer::new(|_, _, _| bail!("unexpected token"))
        .with_name("attributify-jsx")
        .with_phase(Phase::Pre)
        .into_unit();

    let loader = loader(
        vec![
            broken,
            banner("/* default */", Phase::Default),
            banner("/* post */", Phase::Post),
        ],
        Arc::new(MockGeneratorFactory::new()),
        sink.clone(),
    );

    let out = loader
        .transform(SOURCE, &Invocation::for_path("/app/src/Button.tsx"))
        .await
        .unwrap();

    assert!(out.starts_with("/* post *//* default */export const Button"));

    let failures = sink.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].unit, "attributify-jsx");
    assert_eq!(failures[0].file, "/app/src/Button.tsx");
}

#[tokio::test]
async fn test_concurrent_modules_share_one_generator() {
    let factory = Arc::new(MockGeneratorFactory::new().with_delay(Duration::from_millis(30)));
    let loader = Arc::new(loader(
        vec![banner("// uno\n", Phase::Default)],
        factory.clone(),
        Arc::new(NoOpSink),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let loader = loader.clone();
        handles.push(tokio::spawn(async move {
            let path = format!("/app/src/module{}.ts", i);
            loader
                .transform("export const value = 42;", &Invocation::for_path(path))
                .await
        }));
    }

    for handle in handles {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(out, "// uno\nexport const value = 42;");
    }

    assert_eq!(factory.constructions(), 1);
    assert_eq!(loader.generator().loader().load_count(), 1);
    assert_eq!(loader.cache_len(), 8);
}

#[tokio::test]
async fn test_failed_initialization_is_retried() {
    let factory = Arc::new(MockGeneratorFactory::new().failing_first(1));
    let loader = loader(
        vec![banner("// uno\n", Phase::Default)],
        factory.clone(),
        Arc::new(NoOpSink),
    );
    let invocation = Invocation::for_path("/app/src/a.ts");

    let err = loader
        .transform("export const a = 1;", &invocation)
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Construction { .. }));
    assert_eq!(loader.cache_len(), 0);

    let out = loader
        .transform("export const a = 1;", &invocation)
        .await
        .unwrap();
    assert_eq!(out, "// uno\nexport const a = 1;");
    assert_eq!(factory.constructions(), 2);
}

#[tokio::test]
async fn test_json_config_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(JsonConfigSource::DEFAULT_FILE_NAME),
        r#"{
            "plugins": [
                ["autoprefixer", {}],
                ["@unocss/postcss", {
                    "configOrPath": {
                        "transformers": ["variant-group"],
                        "presets": ["uno"]
                    }
                }]
            ]
        }"#,
    )
    .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = TransformerRegistry::new();
    registry.register("variant-group", variant_group(calls.clone()));

    let settings = TransformSettings::new(temp_dir.path());
    let loader = TransformLoader::with_sink(
        &settings,
        ConfigLoader::new(JsonConfigSource::new(settings.config_path(), registry)),
        Arc::new(MockGeneratorFactory::new()),
        Arc::new(NoOpSink),
    );

    let out = loader
        .transform(SOURCE, &Invocation::for_path("/app/src/Button.tsx"))
        .await
        .unwrap();

    assert!(out.contains("hover:bg-red hover:text-white"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_generator_plugin_surfaces_config_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(JsonConfigSource::DEFAULT_FILE_NAME),
        r#"{ "plugins": [["autoprefixer", {}]] }"#,
    )
    .unwrap();

    let settings = TransformSettings::new(temp_dir.path());
    let loader = TransformLoader::with_sink(
        &settings,
        ConfigLoader::new(JsonConfigSource::new(
            settings.config_path(),
            TransformerRegistry::new(),
        )),
        Arc::new(MockGeneratorFactory::new()),
        Arc::new(NoOpSink),
    );

    let err = loader
        .transform(SOURCE, &Invocation::for_path("/app/src/Button.tsx"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GeneratorError::Config(ConfigError::MissingGeneratorConfig)
    );

    // ineligible modules never touch the configuration
    let out = loader
        .transform(SOURCE, &Invocation::for_path("/app/src/Button.test.tsx"))
        .await
        .unwrap();
    assert_eq!(out, SOURCE);
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PAPERS: &str = "\"researchmap\",\"published_papers\"
ID,タイトル(英語),タイトル(日本語),著者(英語),出版年月,主要な業績かどうか,公開の有無
p1,Deep Things,深いこと,\"[Smith, J.\\]\",2023-05,1,
p2,Hidden,,,2022-01,,closed
";

const PRESENTATIONS: &str = "\"researchmap\",\"presentations\"
ID,タイトル(英語),発表年月日,公開の有無
t1,Talk,2022-10-01,
";

const EMPTY_MISC: &str = "\"researchmap\",\"misc\"
ID,タイトル(英語),出版年月,公開の有無
";

const AWARDS: &str = "\"researchmap\",\"awards\"
ID,賞名(英語),受賞年月,公開の有無
a1,Closed Award,2021-01,closed
";

const PROJECTS: &str = "\"researchmap\",\"research_projects\"
ID,制度名(英語),研究期間(From),公開の有無
r1,KAKENHI,2020-04,
";

/// Lays out researchmap exports the way the website repo keeps them.
fn create_exports(data_dir: &Path) {
    fs::create_dir_all(data_dir).expect("Creating data dir failed");
    for (name, body) in [
        ("rm_published_papers.csv", PAPERS),
        ("rm_presentations.csv", PRESENTATIONS),
        ("rm_misc.csv", EMPTY_MISC),
        ("rm_awards.csv", AWARDS),
        ("rm_research_projects.csv", PROJECTS),
    ] {
        fs::write(data_dir.join(name), body).expect("Writing export failed");
    }
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("researchmap-api").expect("Binary exists");
    cmd.env_remove("RESEARCHMAP_DATA_DIR")
        .env_remove("RESEARCHMAP_OUTPUT_DIR");
    cmd
}

#[test]
fn runs_without_arguments_using_default_paths() {
    let workdir = tempdir().unwrap();
    create_exports(&workdir.path().join("data"));

    cli()
        .current_dir(workdir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 12 files"));

    let out = workdir.path().join("public").join("api");
    let papers: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("papers.json")).unwrap()).unwrap();
    assert_eq!(papers.as_array().unwrap().len(), 1);
    assert_eq!(papers[0]["authors"], "Smith, J.");
    assert_eq!(papers[0]["year"], "2023");
    assert_eq!(papers[0]["month"], "05");
    assert_eq!(papers[0]["isMainWork"], true);

    let awards = fs::read_to_string(out.join("awards.json")).unwrap();
    assert_eq!(awards, "[]");

    let years = fs::read_to_string(out.join("years.json")).unwrap();
    assert_eq!(years, "{\n  \"years\": [\n    \"2023\",\n    \"2022\"\n  ]\n}");
    assert!(out.join("misc-2022.json").exists());
    assert!(out.join("presentations-2023.json").exists());
}

#[test]
fn directory_flags_override_defaults() {
    let workdir = tempdir().unwrap();
    let data_dir = workdir.path().join("exports");
    let output_dir = workdir.path().join("site").join("api");
    create_exports(&data_dir);

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    assert!(output_dir.join("researchProjects.json").exists());
}

#[test]
fn environment_selects_directories() {
    let workdir = tempdir().unwrap();
    let data_dir = workdir.path().join("from-env");
    let output_dir = workdir.path().join("out-env");
    create_exports(&data_dir);

    cli()
        .current_dir(workdir.path())
        .env("RESEARCHMAP_DATA_DIR", &data_dir)
        .env("RESEARCHMAP_OUTPUT_DIR", &output_dir)
        .assert()
        .success();

    assert!(output_dir.join("papers.json").exists());
}

#[test]
fn config_file_selects_source_names() {
    let workdir = tempdir().unwrap();
    let data_dir = workdir.path().join("data");
    create_exports(&data_dir);
    fs::rename(
        data_dir.join("rm_misc.csv"),
        data_dir.join("misc_2024.csv"),
    )
    .unwrap();
    let config = workdir.path().join("researchmap.yaml");
    fs::write(
        &config,
        "output_dir: ./built\nsources:\n  misc: misc_2024.csv\n",
    )
    .unwrap();

    cli()
        .current_dir(workdir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(workdir.path().join("built").join("misc.json").exists());
}

#[test]
fn missing_export_fails_the_build() {
    let workdir = tempdir().unwrap();

    cli()
        .current_dir(workdir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rm_published_papers.csv"));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::Context, Layer, Registry};
use tracing_subscriber::prelude::*; // needed for .with()

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        use std::fmt::Write as FmtWrite;
        let mut msg = String::new();
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[test]
fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use researchmap_api::cli::{run, Cli};

    // A config path that does not exist makes run() fail after the first event.
    let cli = Cli {
        config: Some(std::path::PathBuf::from("dummy.yaml")),
        ..Cli::default()
    };

    let result = run(cli);
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

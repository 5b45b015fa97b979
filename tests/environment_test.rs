mod common;

use norn::analyzer::parsers::MAX_NESTING;
use norn::environment::{Environment, FILE_UNPARSEABLE, FILE_UNREADABLE, FILE_UNWRITABLE};
use norn::persistence::ListStore;
use norn::{parse, AddressSet, Expression};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

// tokio's blocking pool runs commands on threads this size
const WORKER_STACK: usize = 2 * 1024 * 1024;

fn environment_in(dir: &std::path::Path) -> Environment {
    Environment::with_store(ListStore::new(dir))
}

#[test]
fn it_evaluates_definition_then_difference() {
    let env = Environment::new();
    assert_eq!(
        env.execute("ab = A@a.com, b@b.com; ab!a@a.com").unwrap(),
        "b@b.com"
    );
    assert_eq!(
        env.get("ab"),
        Some(Expression::addresses(["a@a.com", "b@b.com"]).unwrap())
    );
}

#[test]
fn it_answers_each_command_in_turn() {
    let env = Environment::new();
    assert_eq!(env.execute("a = a@a.com").unwrap(), "a@a.com");
    assert_eq!(env.execute("a,c@c.com").unwrap(), "a@a.com, c@c.com");
}

#[test]
fn it_redefines_a_list_in_terms_of_itself() {
    let env = Environment::new();
    env.execute("list1 = a@b").unwrap();
    assert_eq!(env.execute("list1 = list1, a@c.com").unwrap(), "a@b, a@c.com");
    assert_eq!(env.execute("list1").unwrap(), "a@b, a@c.com");
}

#[test]
fn it_treats_unbound_names_as_empty() {
    let env = Environment::new();
    assert_eq!(env.execute("nope").unwrap(), "");
    assert_eq!(env.execute("nope, a@x").unwrap(), "a@x");
}

#[test]
fn it_normalizes_and_deduplicates() {
    let set = AddressSet::from_raw(["a@b.com", "A@B.COM"]).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.to_string(), "(a@b.com)");
}

#[test]
fn it_rejects_two_name_cycles() {
    let env = Environment::new();
    env.assign("x", Expression::named("y")).unwrap();

    let err = env.assign("y", Expression::named("x")).unwrap_err();
    assert!(err.is_cycle());
    assert!(!env.contains("y"));
    assert_eq!(env.get("x"), Some(Expression::named("y")));
}

#[test]
fn it_keeps_assignments_made_before_a_cycle() {
    let env = Environment::new();
    env.execute("x = y").unwrap();

    let err = env.execute("z = a@x; y = x").unwrap_err();
    assert!(err.is_cycle());
    assert_eq!(env.execute("z").unwrap(), "a@x");
    assert!(!env.contains("y"));
}

/// The assignment check looks one hop deep, so a three-name cycle is accepted.
/// Resolving any of its names then fails instead of recursing forever.
#[test]
fn it_accepts_three_name_cycles_but_refuses_to_resolve_them() {
    let env = Environment::new();
    env.execute("x = y").unwrap();
    env.execute("y = z").unwrap();
    env.execute("z = x").unwrap();

    assert_eq!(env.names(), vec!["x", "y", "z"]);
    assert!(env.execute("x").unwrap_err().is_cycle());
    assert!(env.execute("a@x").is_ok());
}

#[test]
fn it_stores_simplified_values() {
    let env = Environment::new();
    env.execute("x = (y = a@x; b@x), c@x").unwrap();
    assert_eq!(env.get("x"), Some(parse("(b@x), c@x").unwrap()));
    assert_eq!(env.get("y"), Some(parse("a@x").unwrap()));
}

#[test]
fn it_saves_and_loads_lists() {
    let dir = tempdir().unwrap();
    let env = environment_in(dir.path());

    env.execute("list1=a@a.com").unwrap();
    env.execute("list2=b@b.com").unwrap();
    assert_eq!(env.execute("!save f").unwrap(), "");
    assert!(env.is_empty());
    assert_eq!(env.execute("list1").unwrap(), "");

    assert_eq!(env.execute("!load f").unwrap(), "");
    assert_eq!(env.execute("list1").unwrap(), "a@a.com");
    assert_eq!(env.execute("list2").unwrap(), "b@b.com");
}

#[test]
fn it_round_trips_compound_lists_through_a_file() {
    let dir = tempdir().unwrap();
    let env = environment_in(dir.path());

    env.execute("staff = a@x, b@x").unwrap();
    env.execute("ta = c@x").unwrap();
    env.execute("course = (staff, ta) ! b@x").unwrap();
    let before = env.execute("course").unwrap();

    env.save("lists.txt").unwrap();
    env.load("lists.txt").unwrap();

    assert_eq!(env.len(), 3);
    assert_eq!(env.execute("course").unwrap(), before);
    assert_eq!(before, "a@x, c@x");
}

#[test]
fn it_merges_loaded_lists() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("extra"), "extra=e@x\n").unwrap();

    let env = environment_in(dir.path());
    env.execute("mine = m@x").unwrap();
    assert_eq!(env.execute("!loadextra").unwrap(), "");
    assert_eq!(env.names(), vec!["extra", "mine"]);
}

#[test]
fn it_reports_persistence_failures_as_messages() {
    let dir = tempdir().unwrap();
    let env = environment_in(dir.path());

    assert_eq!(env.execute("!load missing").unwrap(), FILE_UNREADABLE);

    std::fs::write(dir.path().join("broken"), "x = a@a@a.com\n").unwrap();
    assert_eq!(env.execute("!load broken").unwrap(), FILE_UNPARSEABLE);

    env.execute("keep = a@x").unwrap();
    assert_eq!(env.execute("!save missing/dir/f").unwrap(), FILE_UNWRITABLE);
    assert_eq!(env.execute("keep").unwrap(), "a@x");
}

#[test]
fn it_clears_the_environment() {
    let env = Environment::new();
    env.execute("x = a@x").unwrap();
    env.clear();
    assert!(env.is_empty());
    assert!(!env.contains("x"));
}

#[test]
fn it_rejects_oversized_commands_and_keeps_serving() {
    let env = Arc::new(Environment::new());
    env.execute("keep = a@x").unwrap();

    let worker = {
        let env = env.clone();
        thread::Builder::new()
            .stack_size(WORKER_STACK)
            .spawn(move || {
                let nested = format!("{}a@x{}", "(".repeat(3000), ")".repeat(3000));
                let chain = vec!["n"; 30000].join(",");
                let grouped = format!("(({}))", chain);
                let deepest = format!(
                    "{}b@x{}",
                    "(".repeat(MAX_NESTING),
                    ")".repeat(MAX_NESTING)
                );
                [nested, chain, grouped, deepest]
                    .iter()
                    .map(|command| env.execute(command).map_err(|e| e.is_parse()))
                    .collect::<Vec<_>>()
            })
            .unwrap()
    };

    assert_eq!(
        worker.join().unwrap(),
        vec![Err(true), Err(true), Err(true), Ok("b@x".to_string())]
    );
    assert_eq!(env.execute("keep").unwrap(), "a@x");
}

#[test]
fn it_reloads_a_list_grown_one_address_at_a_time() {
    let dir = tempdir().unwrap();
    let env = environment_in(dir.path());

    env.execute("team = a0@x.org").unwrap();
    for i in 1..300 {
        env.execute(&format!("team = team, a{}@x.org", i)).unwrap();
    }
    let grown = env.get("team");

    assert_eq!(env.execute("!save team.txt").unwrap(), "");
    assert_eq!(env.execute("!load team.txt").unwrap(), "");
    assert_eq!(env.get("team"), grown);
    assert_eq!(env.execute("team").unwrap().split(", ").count(), 300);
}

#[test]
fn it_loads_files_with_many_records() {
    let dir = tempdir().unwrap();
    let records: String = (0..2000)
        .map(|i| format!("n{}=a{}@x.org;\n", i, i))
        .collect();
    std::fs::write(dir.path().join("many.txt"), records).unwrap();

    let env = environment_in(dir.path());
    assert_eq!(env.execute("!load many.txt").unwrap(), "");
    assert_eq!(env.len(), 2000);
    assert_eq!(env.execute("n1999").unwrap(), "a1999@x.org");
}

#[test]
fn it_keeps_file_names_inside_the_data_directory() {
    let root = tempdir().unwrap();
    let data = root.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(root.path().join("outside.txt"), "x=a@x;\n").unwrap();

    let env = environment_in(&data);
    env.execute("keep = a@x").unwrap();

    let absolute = root.path().join("absolute.txt");
    for command in [
        "!save ../escaped.txt".to_string(),
        format!("!save {}", absolute.display()),
        "!save sub/../../escaped.txt".to_string(),
    ] {
        assert_eq!(env.execute(&command).unwrap(), FILE_UNWRITABLE);
    }
    assert!(!root.path().join("escaped.txt").exists());
    assert!(!absolute.exists());
    assert!(env.contains("keep"));

    let outside = root.path().join("outside.txt");
    assert_eq!(env.execute("!load ../outside.txt").unwrap(), FILE_UNREADABLE);
    assert_eq!(
        env.execute(&format!("!load {}", outside.display())).unwrap(),
        FILE_UNREADABLE
    );
    assert!(!env.contains("x"));
}

//! # Run Subcommands
//!
//! `example`, `validate` and `invoke`: the pre-submit and execution paths.
//!
//! Exit codes: 0 on success, 1 when input is invalid or the ability
//! fails. Unknown abilities and unreadable input are operational errors.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use serde_json::json;

use abex_registry::{check_input, invoke, InvokeError};
use abex_schema::{generate_example_with, ExampleOptions, Schema};

use crate::{read_input, Session};

/// Arguments for `abex validate` and `abex invoke`.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Ability name (`namespace/slug`).
    pub ability: String,

    /// Input as JSON text.
    #[arg(long, short, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Read input JSON from a file.
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,
}

/// Arguments for `abex example`.
#[derive(Args, Debug, Default)]
pub struct ExampleArgs {
    /// Ability name (`namespace/slug`).
    pub ability: String,

    /// Expand nested object properties instead of emitting `{}`.
    #[arg(long)]
    pub deep: bool,
}

/// Execute `abex example`.
pub fn run_example(args: &ExampleArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let Some(ability) = session.registry.get(&args.ability) else {
        bail!("ability \"{}\" not found", args.ability);
    };
    let schema = Schema::from_value(ability.input_schema());
    let example = generate_example_with(
        &schema,
        ExampleOptions {
            expand_nested: args.deep,
        },
    );
    writeln!(out, "{}", serde_json::to_string_pretty(&example)?)?;
    Ok(0)
}

/// Execute `abex validate`.
pub fn run_validate(args: &InputArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let input = read_input(args.input.as_deref(), args.input_file.as_deref())?;
    let result = check_input(&session.registry, &args.ability, &input).map_err(operational)?;

    if result.valid {
        writeln!(out, "OK: input is valid for {}", args.ability)?;
        return Ok(0);
    }
    for error in &result.errors {
        writeln!(out, "  FAIL: {error}")?;
    }
    writeln!(out, "\n{} validation error(s).", result.errors.len())?;
    Ok(1)
}

/// Execute `abex invoke`. Prints the result envelope as JSON.
pub fn run_invoke(args: &InputArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let input = read_input(args.input.as_deref(), args.input_file.as_deref())?;

    match invoke(&session.registry, &args.ability, input) {
        Ok(invocation) => {
            let envelope = json!({
                "success": true,
                "message": "Ability invoked successfully.",
                "data": invocation.data,
                "invocation_id": invocation.id,
                "invoked_at": invocation.invoked_at,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
            Ok(0)
        }
        Err(err @ (InvokeError::MissingSlug | InvokeError::NotFound(_))) => Err(operational(err)),
        Err(err) => {
            let mut envelope = json!({"success": false, "message": err.to_string()});
            match &err {
                InvokeError::Validation { errors } => envelope["errors"] = json!(errors),
                InvokeError::Failed(failure) => envelope["code"] = json!(failure.code),
                InvokeError::MissingSlug | InvokeError::NotFound(_) => {}
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
            Ok(1)
        }
    }
}

fn operational(err: InvokeError) -> anyhow::Error {
    match err {
        InvokeError::NotFound(name) => anyhow!("ability \"{name}\" not found"),
        other => anyhow!(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const CATALOG: &str = r#"
abilities:
  - name: acme/greet
    label: Greet
    input_schema:
      type: object
      required: [name]
      properties:
        name: { type: string }
        times: { type: integer, example: 3 }
        options:
          type: object
          properties:
            loud: { type: boolean }
    result: { greeting: hello }
  - name: acme/down
    error: { code: acme_down, message: Service unavailable. }
"#;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abilities.yaml");
        std::fs::write(&path, CATALOG).unwrap();
        let session = Session::load(Some(&path), &[], &[]).unwrap();
        (dir, session)
    }

    fn input_args(ability: &str, input: Option<&str>) -> InputArgs {
        InputArgs {
            ability: ability.into(),
            input: input.map(str::to_string),
            input_file: None,
        }
    }

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> Result<u8>) -> (u8, String) {
        let mut out = Vec::new();
        let code = f(&mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn example_is_shallow_unless_deep() {
        let (_dir, session) = session();
        let mut args = ExampleArgs {
            ability: "acme/greet".into(),
            deep: false,
        };
        let (_, text) = capture(|out| run_example(&args, &session, out));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"name": "", "times": 3, "options": {}}));

        args.deep = true;
        let (_, text) = capture(|out| run_example(&args, &session, out));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["options"], json!({"loud": false}));
    }

    #[test]
    fn validate_exit_codes() {
        let (_dir, session) = session();
        let args = input_args("acme/greet", Some(r#"{"name": "Ann"}"#));
        let (code, text) = capture(|out| run_validate(&args, &session, out));
        assert_eq!(code, 0);
        assert!(text.starts_with("OK"));

        let args = input_args("acme/greet", Some(r#"{"times": "x"}"#));
        let (code, text) = capture(|out| run_validate(&args, &session, out));
        assert_eq!(code, 1);
        assert!(text.contains("Required field \"name\" is missing"));
        assert!(text.contains("Field \"times\" should be of type \"integer\""));
        assert!(text.contains("2 validation error(s)."));
    }

    #[test]
    fn invoke_success_prints_envelope() {
        let (_dir, session) = session();
        let args = input_args("acme/greet", Some(r#"{"name": "Ann"}"#));
        let (code, text) = capture(|out| run_invoke(&args, &session, out));
        assert_eq!(code, 0);
        let envelope: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["data"], json!({"greeting": "hello"}));
    }

    #[test]
    fn invoke_failures_exit_one() {
        let (_dir, session) = session();
        let args = input_args("acme/greet", None);
        let (code, text) = capture(|out| run_invoke(&args, &session, out));
        assert_eq!(code, 1);
        let envelope: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope["message"], "Input validation failed.");
        assert_eq!(envelope["errors"][0], "Required field \"name\" is missing");

        let (code, text) = capture(|out| run_invoke(&input_args("acme/down", None), &session, out));
        assert_eq!(code, 1);
        let envelope: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope["code"], "acme_down");
    }

    #[test]
    fn unknown_ability_is_an_error() {
        let (_dir, session) = session();
        let err = run_invoke(&input_args("acme/missing", None), &session, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "ability \"acme/missing\" not found");
        let err = run_validate(&input_args("", None), &session, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Ability slug is required.");
    }
}

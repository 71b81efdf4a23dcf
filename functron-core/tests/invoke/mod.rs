mod server;

use std::{fs, path::PathBuf};

use axum::http::StatusCode;
use base64::{prelude::BASE64_STANDARD, Engine};
use functron_core::{FunctronError, FunctronResult, Invocation, OutputValue};
use serde_json::{json, Value};
use tempfile::TempDir;

use server::MockServer;

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_invoke_hello_world() -> FunctronResult<()> {
    let server = MockServer::start(StatusCode::OK, hello_world_body().to_string()).await;
    let fixture = helper::Fixture::new()?;

    let mut invocation = Invocation::new("hello")?;
    invocation.add_files(fixture.hello_script(), "")?;
    let response = invocation.invoke(&server.url, None, None).await?;

    let request = server.single_request();
    assert_eq!(request["FnName"], "hello");
    assert_eq!(request["DockerFile"], Value::Null);
    assert_eq!(request["Stdin"], "");
    assert_eq!(request["Timeout"], 5.0);
    assert!(!request["TarFile"].as_str().unwrap().is_empty());

    assert_eq!(
        response.get_cmd_output().get_stdout(),
        &Some(OutputValue::Bytes(b"Hello World!\n".to_vec()))
    );
    assert_eq!(response.get_cmd_output().get_stderr(), &None);
    assert_eq!(response.get_build_output().get_stderr(), &None);
    assert!(response.is_success());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_sends_dockerfile_stdin_and_timeout() -> FunctronResult<()> {
    let server = MockServer::start(StatusCode::OK, hello_world_body().to_string()).await;
    let fixture = helper::Fixture::new()?;

    let mut invocation = Invocation::new("hello-stdin")?;
    invocation.set_dockerfile(fixture.dockerfile())?;
    invocation.add_files(fixture.dir(), "")?;
    invocation
        .invoke(&server.url, Some(&b"Functron User!"[..]), Some(1.0))
        .await?;

    let request = server.single_request();
    assert_eq!(request["DockerFile"], helper::DOCKERFILE);
    assert_eq!(request["Stdin"], BASE64_STANDARD.encode("Functron User!"));
    assert_eq!(request["Timeout"], 1.0);

    let tar = BASE64_STANDARD
        .decode(request["TarFile"].as_str().unwrap())
        .unwrap();
    let mut archive = tar::Archive::new(tar.as_slice());
    let names = archive
        .entries()?
        .map(|entry| -> std::io::Result<String> {
            Ok(entry?.path()?.to_string_lossy().into_owned())
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    // `COPY . /fn` in the Dockerfile expects the function directory's contents at the root.
    assert!(names.iter().any(|name| name == "hello.sh"));
    assert!(!names.iter().any(|name| name.starts_with("test_fn_hello_world")));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_build_failure_is_reported_not_raised() -> FunctronResult<()> {
    let body = json!({
        "Errors": ["BuildFailure"],
        "BuildContextStderr": BASE64_STANDARD.encode("The command '/bin/sh -c exit 1' returned a non-zero code: 1\n"),
        "BuildContextStdout": BASE64_STANDARD.encode("Step 1/3 : FROM alpine\n"),
        "CmdErr": "",
        "CmdOut": "",
        "CleanupErr": "",
        "CleanupOut": "",
        "TempName": "functron-broken-qwert:1.0",
        "DetailedError": "exit status 1"
    });
    // The server writes a blank line ahead of the body on failures.
    let server = MockServer::start(StatusCode::BAD_REQUEST, format!("\n{}", body)).await;
    let fixture = helper::Fixture::new()?;

    let mut invocation = Invocation::new("broken")?;
    invocation.add_files(fixture.dir(), "")?;
    let response = invocation.invoke(&server.url, None, Some(1.0)).await?;

    assert_eq!(
        response.get_build_output().get_stderr(),
        &Some(OutputValue::Bytes(
            b"The command '/bin/sh -c exit 1' returned a non-zero code: 1\n".to_vec()
        ))
    );
    assert_eq!(response.get_cmd_output().get_stderr(), &None);
    assert_eq!(response.get_errors(), &vec!["BuildFailure".to_string()]);
    assert_eq!(response.get_detailed_error().as_deref(), Some("exit status 1"));
    assert!(!response.is_success());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_failure_keeps_command_stderr_raw() -> FunctronResult<()> {
    let mut body = hello_world_body();
    body["Errors"] = json!(["Process did not exit right"]);
    body["CmdErr"] = json!("RXJyb3I=");
    body["CmdOut"] = json!("");
    let server = MockServer::start(StatusCode::OK, body.to_string()).await;

    let mut invocation = Invocation::new("failing")?;
    let response = invocation.invoke(&server.url, None, None).await?;

    assert_eq!(
        response.get_cmd_output().get_stderr(),
        &Some(OutputValue::Text("RXJyb3I=".to_string()))
    );
    assert_eq!(response.get_build_output().get_stderr(), &None);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_unexpected_status_is_network_error() -> FunctronResult<()> {
    let server = MockServer::start(StatusCode::SERVICE_UNAVAILABLE, "try again later").await;

    let mut invocation = Invocation::new("hello")?;
    let err = invocation.invoke(&server.url, None, None).await.unwrap_err();

    assert!(err.is_network());
    assert!(matches!(
        err,
        FunctronError::UnexpectedStatus { status: 503, .. }
    ));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_incomplete_response_is_decode_error() -> FunctronResult<()> {
    let mut body = hello_world_body();
    body.as_object_mut().unwrap().remove("CleanupOut");
    let server = MockServer::start(StatusCode::OK, body.to_string()).await;

    let mut invocation = Invocation::new("hello")?;
    let err = invocation.invoke(&server.url, None, None).await.unwrap_err();

    assert!(matches!(err, FunctronError::MissingField("CleanupOut")));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invoke_connection_refused_is_network_error() -> FunctronResult<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/", listener.local_addr()?);
    drop(listener);

    let mut invocation = Invocation::new("hello")?;
    let err = invocation.invoke(&url, None, None).await.unwrap_err();

    assert!(matches!(err, FunctronError::Network(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invalid_timeout_override_sends_nothing() -> FunctronResult<()> {
    let server = MockServer::start(StatusCode::OK, hello_world_body().to_string()).await;

    let mut invocation = Invocation::new("hello")?;
    let err = invocation.invoke(&server.url, None, Some(0.0)).await.unwrap_err();

    assert!(err.is_validation());
    assert!(!invocation.is_sealed());
    assert_eq!(server.request_count(), 0);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_add_files_after_invoke_is_state_error() -> FunctronResult<()> {
    let server = MockServer::start(StatusCode::OK, hello_world_body().to_string()).await;
    let fixture = helper::Fixture::new()?;

    let mut invocation = Invocation::new("hello")?;
    invocation.add_files(fixture.hello_script(), "")?;
    invocation.invoke(&server.url, None, None).await?;

    let err = invocation.add_files(fixture.dockerfile(), "").unwrap_err();
    assert!(err.is_state());
    Ok(())
}

#[test]
fn test_invoke_blocking_hello_world() -> FunctronResult<()> {
    let server = MockServer::start_detached(StatusCode::OK, hello_world_body().to_string());
    let fixture = helper::Fixture::new()?;

    let mut invocation = Invocation::new("hello")?;
    invocation.set_dockerfile(fixture.dockerfile())?;
    invocation.add_files(fixture.hello_script(), "")?;
    let response = invocation.invoke_blocking(&server.url, None, Some(2.5))?;

    assert_eq!(server.single_request()["Timeout"], 2.5);
    assert_eq!(
        response.get_cmd_output().get_stdout(),
        &Some(OutputValue::Bytes(b"Hello World!\n".to_vec()))
    );
    assert_eq!(response.get_cmd_output().get_stderr(), &None);
    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn hello_world_body() -> Value {
    json!({
        "Errors": [],
        "BuildContextStderr": "",
        "BuildContextStdout": BASE64_STANDARD.encode("Successfully built 3f2a1b\n"),
        "CmdErr": "",
        "CmdOut": BASE64_STANDARD.encode("Hello World!\n"),
        "CleanupErr": "",
        "CleanupOut": BASE64_STANDARD.encode("Untagged: functron-hello-abcde:1.0\n"),
        "TempName": "functron-hello-abcde:1.0"
    })
}

mod helper {
    use super::*;

    pub(super) const DOCKERFILE: &str = "FROM alpine\nCOPY . /fn\nCMD [\"/bin/sh\", \"/fn/hello.sh\"]\n";

    /// A function directory with a Dockerfile and a script.
    pub(super) struct Fixture {
        _root: TempDir,
        dir: PathBuf,
    }

    impl Fixture {
        pub(super) fn new() -> FunctronResult<Self> {
            let root = TempDir::new()?;
            let dir = root.path().join("test_fn_hello_world");
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("Dockerfile"), DOCKERFILE)?;
            fs::write(dir.join("hello.sh"), "#!/bin/sh\necho Hello World!\n")?;
            Ok(Self { _root: root, dir })
        }

        pub(super) fn dir(&self) -> &PathBuf {
            &self.dir
        }

        pub(super) fn dockerfile(&self) -> PathBuf {
            self.dir.join("Dockerfile")
        }

        pub(super) fn hello_script(&self) -> PathBuf {
            self.dir.join("hello.sh")
        }
    }
}

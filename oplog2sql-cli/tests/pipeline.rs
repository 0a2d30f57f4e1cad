//! File-to-file end-to-end run.

use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

use oplog2sql_cli::file::{FileSink, FileSource};
use oplog2sql_core::pipeline::Pipeline;
use oplog2sql_core::translator::Translator;

#[tokio::test]
async fn test_file_to_file_replay() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.sql");

    let lines = concat!(
        r#"[{"op":"i","ns":"test.student","o":{"_id":"635b79e231d82a8ab1de863b","name":"Selena Miller","roll_no":51,"is_graduated":false,"date_of_birth":"2000-01-30","phone":{"personal":"7678456640","work":"8130097989"}}}]"#,
        "\n",
        r#"[{"op":"u","ns":"test.student","o":{"diff":{"u":{"name":"Selena M"}}},"o2":{"_id":"635b79e231d82a8ab1de863b"}},{"op":"d","ns":"test.student","o":{"_id":"635b79e231d82a8ab1de863b"}}]"#,
        "\n",
    );
    std::fs::write(&input, lines).expect("write input");

    let translator = Translator::new(Box::new(|| "random-uuid".to_owned()));
    Pipeline::new(
        Box::new(FileSource::new(&input)),
        Box::new(FileSink::new(&output)),
        translator,
    )
    .run(CancellationToken::new())
    .await
    .expect("pipeline run");

    let sql = std::fs::read_to_string(&output).expect("read output");
    let expected = "\
CREATE SCHEMA test;
CREATE TABLE test.student (_id VARCHAR(255) PRIMARY KEY, date_of_birth VARCHAR(255), is_graduated BOOLEAN, name VARCHAR(255), roll_no FLOAT);
CREATE TABLE test.student_phone (_id VARCHAR(255) PRIMARY KEY, personal VARCHAR(255), student__id VARCHAR(255), work VARCHAR(255));
INSERT INTO test.student_phone (_id, personal, student__id, work) VALUES ('random-uuid', '7678456640', '635b79e231d82a8ab1de863b', '8130097989');
INSERT INTO test.student (_id, date_of_birth, is_graduated, name, roll_no) VALUES ('635b79e231d82a8ab1de863b', '2000-01-30', false, 'Selena Miller', 51);
UPDATE test.student SET name = 'Selena M' WHERE _id = '635b79e231d82a8ab1de863b';
DELETE FROM test.student WHERE _id = '635b79e231d82a8ab1de863b';
";
    assert_eq!(sql, expected);
}

#[tokio::test]
async fn test_malformed_input_line_is_terminal() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.sql");
    std::fs::write(&input, "this is not json\n").expect("write input");

    let translator = Translator::new(Box::new(|| "random-uuid".to_owned()));
    let result = Pipeline::new(
        Box::new(FileSource::new(&input)),
        Box::new(FileSink::new(&output)),
        translator,
    )
    .run(CancellationToken::new())
    .await;
    assert!(result.is_err());
}

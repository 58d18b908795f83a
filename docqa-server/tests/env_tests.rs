//! Deployment configuration loaded from a `.env` file.
//!
//! The binaries call `dotenvy::dotenv()` before reading settings, so a
//! deployment that keeps its credentials in a `.env` file next to the
//! binary must work without exporting anything into the process
//! environment beforehand.

use docqa_rag::Settings;

#[test]
fn dotenv_file_populates_settings() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        "QDRANT_URL=http://localhost:6334\n\
         OPENAI_API_KEY=sk-test\n\
         COLLECTION_NAME=docqa_env_test\n",
    )
    .unwrap();

    dotenvy::from_path_override(&env_path).unwrap();

    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.qdrant_url, "http://localhost:6334");
    assert_eq!(settings.collection_name, "docqa_env_test");
    assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
}

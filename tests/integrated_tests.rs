use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modlist_installer::commands;
use modlist_installer::html::TagScanner;
use modlist_installer::models::config::{Endpoints, InstallerConfig};
use modlist_installer::models::manifest::Manifest;
use modlist_installer::models::modlist::parse_modlist;
use modlist_installer::utils::errors::InstallerError;

fn test_config(temp: &TempDir, server: &MockServer) -> InstallerConfig {
    let uri = server.uri();
    InstallerConfig {
        download_dir: temp.path().join("mods"),
        cache_path: temp.path().join("mod.cache"),
        failed_modlist_path: temp.path().join("failed.html"),
        failed_manifest_path: temp.path().join("failed.json"),
        diff_modlist_path: temp.path().join("diff.html"),
        diff_manifest_path: temp.path().join("diff.json"),
        endpoints: Endpoints {
            curseforge_api: format!("{uri}/api"),
            curseforge_site: format!("{uri}/site"),
            cfwidget: format!("{uri}/cfwidget"),
            search: format!("{uri}/html"),
            search_site: "curseforge.com".to_string(),
        },
        ..InstallerConfig::default()
    }
}

async fn mount_version_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/minecraft/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "gameVersionId": 9990, "versionString": "1.20.1" },
                { "gameVersionId": 9971, "versionString": "1.20" }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_files(server: &MockServer, project_id: u32, version_id: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/site/mods/{project_id}/files")))
        .and(query_param("gameVersionId", version_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_download(server: &MockServer, project_id: u32, file_id: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/site/mods/{project_id}/files/{file_id}/download")))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(b"jar".to_vec()))
        .mount(server)
        .await;
}

const MODLIST: &str = r#"<ul>
<li><a href="https://minecraft.curseforge.com/projects/74924">Mantle (by mDiyo)</a></li>
<li><a href="https://www.curseforge.com/minecraft/mc-mods/jei">Just Enough Items (by mezz)</a></li>
<li><a href="https://www.curseforge.com/minecraft/mc-mods/foo">Foo (by someone)</a></li>
<li><a href="https://www.curseforge.com/minecraft/mc-mods/ghost">Ghost</a></li>
</ul>"#;

#[tokio::test]
async fn test_install_modlist() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_version_catalog(&server).await;

    // explicit id
    mount_files(&server, 74924, 9990, json!({ "data": [{ "id": 1, "fileName": "mantle.jar", "fileLength": 3 }] })).await;
    mount_download(&server, 74924, 1, 200).await;

    // cached, only available for the base version
    mount_files(&server, 238222, 9990, json!({ "data": [] })).await;
    mount_files(&server, 238222, 9971, json!({ "data": [{ "id": 2, "fileName": "jei.jar", "fileLength": 3 }] })).await;
    mount_download(&server, 238222, 2, 200).await;

    // resolved through the author, but has no files
    Mock::given(method("GET"))
        .and(path("/cfwidget/author/search/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "username": "someone",
            "projects": [{ "id": 11, "name": "Foo (Fabric)" }, { "id": 12, "name": "Foo (Forge)" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/site/mods/12/files"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // unresolvable
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>No results.</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let modlist = temp.child("modlist.html");
    modlist.write_str(MODLIST).unwrap();
    temp.child("mod.cache").write_str("jei=238222\n").unwrap();

    let config = test_config(&temp, &server);
    let summary = commands::install::run(config, modlist.path(), "1.20.1").await.unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.failed, 2);

    temp.child("mods/1.jar").assert(predicate::path::exists());
    temp.child("mods/2.jar").assert(predicate::path::exists());
    temp.child("mod.cache").assert("foo=12\njei=238222\n");

    let failed = parse_modlist(&fs::read_to_string(temp.path().join("failed.html")).unwrap(), &TagScanner);
    let names: Vec<&str> = failed.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, vec!["Foo", "Ghost"]);
    assert_eq!(failed[0].author, "someone");
}

#[tokio::test]
async fn test_install_unknown_version_is_fatal() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_version_catalog(&server).await;

    let modlist = temp.child("modlist.html");
    modlist.write_str(MODLIST).unwrap();

    let config = test_config(&temp, &server);
    let err = commands::install::run(config, modlist.path(), "1.7.10").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InstallerError>(),
        Some(InstallerError::VersionNotFound(v)) if v == "1.7.10"
    ));
    temp.child("mod.cache").assert(predicate::path::missing());
    temp.child("failed.html").assert(predicate::path::missing());
}

#[tokio::test]
async fn test_install_respects_item_cap() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_version_catalog(&server).await;
    mount_files(&server, 74924, 9990, json!({ "data": [{ "id": 1, "fileName": "mantle.jar", "fileLength": 3 }] })).await;
    mount_download(&server, 74924, 1, 200).await;

    let modlist = temp.child("modlist.html");
    modlist.write_str(MODLIST).unwrap();

    let config = InstallerConfig {
        max_items: 1,
        ..test_config(&temp, &server)
    };
    let summary = commands::install::run(config, modlist.path(), "1.20.1").await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.failed, 0);
    temp.child("mod.cache").assert("");
}

#[tokio::test]
async fn test_install_manifest() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_download(&server, 238222, 4712868, 200).await;
    mount_download(&server, 328085, 4835191, 500).await;

    let manifest = temp.child("manifest.json");
    manifest
        .write_str(
            &json!({
                "minecraft": { "version": "1.20.1", "modLoaders": [{ "id": "forge-47.2.0", "primary": true }] },
                "manifestType": "minecraftModpack",
                "manifestVersion": 1,
                "name": "Test Pack",
                "version": "1.0.0",
                "author": "someone",
                "files": [
                    { "projectID": 238222, "fileID": 4712868, "required": true },
                    { "projectID": 328085, "fileID": 4835191, "required": true }
                ],
                "overrides": "overrides"
            })
            .to_string(),
        )
        .unwrap();

    let config = test_config(&temp, &server);
    let summary = commands::manifest::run(config, manifest.path()).await.unwrap();

    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.failed, 1);
    temp.child("mods/Test Pack/4712868.jar").assert(predicate::path::exists());

    let failed = Manifest::load(&temp.path().join("failed.json")).unwrap();
    assert_eq!(failed.name, "Test Pack");
    assert_eq!(failed.version, "failed");
    assert_eq!(failed.files.len(), 1);
    assert_eq!(failed.files[0].file_id, 4835191);
}

#[tokio::test]
async fn test_diff_modlists() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let config = test_config(&temp, &server);

    let first = temp.child("a.html");
    first.write_str(MODLIST).unwrap();
    let second = temp.child("b.html");
    second
        .write_str(
            r#"<ul>
<li><a href="https://www.curseforge.com/minecraft/mc-mods/jei">Just Enough Items (by mezz)</a></li>
<li><a href="https://www.curseforge.com/minecraft/mc-mods/create">Create (by simibubi)</a></li>
</ul>"#,
        )
        .unwrap();

    let count = commands::diff::run_modlists(&config, first.path(), second.path()).await.unwrap();
    assert_eq!(count, 4);

    let diff = parse_modlist(&fs::read_to_string(temp.path().join("diff.html")).unwrap(), &TagScanner);
    let names: Vec<&str> = diff.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, vec!["Mantle", "Foo", "Ghost", "Create"]);

    let same = commands::diff::run_modlists(&config, first.path(), first.path()).await.unwrap();
    assert_eq!(same, 0);
}

#[tokio::test]
async fn test_diff_manifests() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let config = test_config(&temp, &server);

    let first = temp.child("a.json");
    first
        .write_str(r#"{ "name": "Pack", "author": "me", "version": "1", "files": [{ "projectID": 1, "fileID": 10 }, { "projectID": 2, "fileID": 20 }] }"#)
        .unwrap();
    let second = temp.child("b.json");
    second
        .write_str(r#"{ "name": "Pack", "author": "me", "version": "2", "files": [{ "projectID": 1, "fileID": 10 }, { "projectID": 2, "fileID": 21 }] }"#)
        .unwrap();

    let count = commands::diff::run_manifests(&config, first.path(), second.path()).await.unwrap();
    assert_eq!(count, 2);

    let diff = Manifest::load(&temp.path().join("diff.json")).unwrap();
    assert_eq!(diff.version, "difference");
    assert_eq!(diff.name, "Pack");
    let ids: Vec<u32> = diff.files.iter().map(|f| f.file_id).collect();
    assert_eq!(ids, vec![20, 21]);
}

#[tokio::test]
async fn test_missing_modlist_is_an_error() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let config = test_config(&temp, &server);

    let err = commands::install::run(config, &temp.path().join("nope.html"), "1.20.1")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InstallerError>(),
        Some(InstallerError::FileNotFound(_))
    ));
}

#[tokio::test]
async fn test_install_manifest_with_dot_name_stays_in_download_dir() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_download(&server, 1, 2, 200).await;

    let manifest = temp.child("manifest.json");
    manifest
        .write_str(r#"{ "name": "..", "files": [{ "projectID": 1, "fileID": 2 }] }"#)
        .unwrap();

    let config = test_config(&temp, &server);
    let summary = commands::manifest::run(config, manifest.path()).await.unwrap();

    assert_eq!(summary.downloaded, 1);
    temp.child("mods/2.jar").assert(predicate::path::exists());
    temp.child("2.jar").assert(predicate::path::missing());
}

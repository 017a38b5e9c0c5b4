//! Integration tests for jsmodule CLI commands
//!
//! These tests verify that the CLI commands work end-to-end.
//! Unit tests for individual functions should be in their respective source files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn jsmodule_command(project_root: &Path, config_home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jsmodule"));
    command
        .current_dir(project_root)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    command
}

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A project with a three-module chain, an unreferenced common helper and a template
fn shop_project(root: &Path) {
    touch(
        root,
        "jsmodule.yaml",
        "name: shop\nbundles:\n  - output: dist/shop.js\n    sources: [\"src/**/*.js\", \"src/**/*.html\"]\n",
    );
    touch(
        root,
        "src/app.js",
        "shop.provide('shop.App');\nshop.require('shop.Cart');\nshop.require('shop.views.Row');\n(function (shop) {\n  var APP = 1;\n})(window.shop);\n",
    );
    touch(
        root,
        "src/cart.js",
        "shop.provide('shop.Cart');\nshop.require('shop.Store');\n(function (shop) {\n  var CART = 1;\n})(window.shop);\n",
    );
    touch(
        root,
        "src/store.js",
        "shop.provide('shop.Store');\n(function (shop) {\n  var STORE = 1;\n  /* pragma:DEBUG_START */ console.log('store'); /* pragma:DEBUG_END */\n})(window.shop);\n",
    );
    touch(
        root,
        "src/common/format.js",
        "shop.provide('shop.Format');\n(function (shop) {\n  var FORMAT = 1;\n})(window.shop);\n",
    );
    touch(
        root,
        "src/views/row.html",
        "<!-- shop.provide('shop.views.Row'); -->\n<tr>\n  <td><%= locals.name %></td>\n</tr>\n",
    );
}

#[test]
fn test_init_creates_manifest() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();

    let output = jsmodule_command(temp.path(), config.path())
        .args(["init", "--yes", "--name", "demo"])
        .output()
        .unwrap();

    assert!(output.status.success(), "init failed: {}", stderr(&output));
    let content = fs::read_to_string(temp.path().join("jsmodule.yaml")).unwrap();
    assert!(content.contains("name: demo"));
    assert!(content.contains("dist/demo.js"));
}

#[test]
fn test_init_with_existing_manifest() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());

    let output = jsmodule_command(temp.path(), config.path())
        .args(["init", "--yes"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Already in a jsmodule project"));
}

#[test]
fn test_build_orders_and_prunes() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());

    let output = jsmodule_command(temp.path(), config.path())
        .arg("build")
        .output()
        .unwrap();

    assert!(output.status.success(), "build failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Reconciled 4 files for"));

    let bundle = fs::read_to_string(temp.path().join("dist/shop.js")).unwrap();
    let store = bundle.find("var STORE").unwrap();
    let cart = bundle.find("var CART").unwrap();
    let app = bundle.find("var APP").unwrap();
    assert!(store < cart && cart < app);
    assert!(!bundle.contains("FORMAT"));
    assert!(bundle.contains("**** FILE: "));
    assert!(bundle.contains("shop.views.Row = anonymous;"));
    assert!(bundle.contains("console.log('store')"));
}

#[test]
fn test_build_strip_debug_flag() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());

    let output = jsmodule_command(temp.path(), config.path())
        .args(["build", "--strip-debug"])
        .output()
        .unwrap();

    assert!(output.status.success(), "build failed: {}", stderr(&output));
    let bundle = fs::read_to_string(temp.path().join("dist/shop.js")).unwrap();
    assert!(!bundle.contains("console.log('store')"));
    assert!(bundle.contains("var STORE"));
}

#[test]
fn test_build_missing_module_fails() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());
    touch(
        temp.path(),
        "src/orphan.js",
        "shop.require('shop.Nowhere');\n(function (shop) {})(window.shop);\n",
    );

    let output = jsmodule_command(temp.path(), config.path())
        .arg("build")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Module is missing: shop.Nowhere"));
    assert!(!temp.path().join("dist/shop.js").exists());
}

#[test]
fn test_build_unknown_bundle_fails() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());

    let output = jsmodule_command(temp.path(), config.path())
        .args(["build", "--bundle", "dist/other.js"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No bundle with output"));
}

#[test]
fn test_inspect_json_reports_counts() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    shop_project(temp.path());

    let output = jsmodule_command(temp.path(), config.path())
        .args(["inspect", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "inspect failed: {}", stderr(&output));
    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let units = reports[0]["units"].as_array().unwrap();
    assert_eq!(units.len(), 5);

    let unit = |suffix: &str| {
        units
            .iter()
            .find(|u| u["path"].as_str().unwrap().ends_with(suffix))
            .unwrap()
            .clone()
    };
    assert_eq!(unit("store.js")["reference_count"], 3);
    assert_eq!(unit("cart.js")["reference_count"], 2);
    assert_eq!(unit("app.js")["reference_count"], 1);
    assert_eq!(unit("format.js")["pruned"], true);
    assert_eq!(unit("format.js")["is_common"], true);
    assert!(!temp.path().join("dist/shop.js").exists());
}

#[test]
fn test_commands_outside_project_fail() {
    let temp = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();

    let output = jsmodule_command(temp.path(), config.path())
        .arg("build")
        .output()
        .unwrap();

    assert!(!output.status.success());
}

//! End-to-end sweeps over on-disk source trees.

use std::fs;
use std::path::Path;

use tagsweep_core::config::Config;
use tagsweep_core::sweep::Sweeper;
use tempfile::TempDir;

const PARENT: &str = r#"import { CATEGORIES } from "../core/constants/categories";"#;
const NESTED: &str = r#"import { CATEGORIES } from "../../core/constants/categories";"#;
const DEEP: &str = r#"import { CATEGORIES } from "../../../core/constants/categories";"#;

const FULL_LIST: &str = r#"["protein", "carbs", "vegetables", "fruits", "dairy", "fats", "grains", "legumes", "snacks", "supplements", "others"]"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn sweep(root: &Path, dry_run: bool) -> tagsweep_core::SweepReport {
    let config = Config::default();
    let sweeper = Sweeper::from_config(&config, root).unwrap();
    sweeper.run(root, &config.selection(), dry_run).unwrap()
}

#[test]
fn scenario_a_equality_with_existing_import() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "hooks/useFilter.ts",
        "import { useMemo } from \"react\";\n\
         import { Item } from \"../types\";\n\
         \n\
         export const isProtein = (item: Item) => {\n\
         \x20 if (item.category === \"protein\") return true;\n\
         \x20 return false;\n\
         };\n",
    );

    let report = sweep(root, false);
    assert_eq!(report.updated_count(), 1);

    let out = read(root, "hooks/useFilter.ts");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "import { useMemo } from \"react\";");
    assert_eq!(lines[1], PARENT);
    assert_eq!(lines[2], "import { Item } from \"../types\";");
    assert!(out.contains("  if (item.category === CATEGORIES.protein) return true;\n"));
}

#[test]
fn scenario_a_without_imports_prepends() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "a.ts", "export const f = (c: string) => c !== \"fats\";\n");

    sweep(root, false);
    assert_eq!(
        read(root, "a.ts"),
        format!("{}\nexport const f = (c: string) => c !== CATEGORIES.fats;\n", PARENT)
    );
}

#[test]
fn scenario_b_full_membership_list() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "logic/order.ts",
        &format!("export const ORDER: string[] = {};\n", FULL_LIST),
    );

    let report = sweep(root, false);
    assert_eq!(report.updated[0].substitutions, 1);

    let out = read(root, "logic/order.ts");
    assert_eq!(
        out,
        format!(
            "{}\nexport const ORDER: string[] = [CATEGORIES.protein, CATEGORIES.carbs, \
             CATEGORIES.vegetables, CATEGORIES.fruits, CATEGORIES.dairy, CATEGORIES.fats, \
             CATEGORIES.grains, CATEGORIES.legumes, CATEGORIES.snacks, \
             CATEGORIES.supplements, CATEGORIES.others];\n",
            NESTED
        )
    );
}

#[test]
fn scenario_c_components_use_deep_import() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "components/CategoryBadge.tsx",
        "import React from \"react\";\n\
         export const Badge = ({ c }: { c: string }) =>\n\
         \x20 c === \"dairy\" ? <span>milk</span> : null;\n",
    );

    sweep(root, false);
    let out = read(root, "components/CategoryBadge.tsx");
    assert_eq!(out.lines().nth(1), Some(DEEP));
}

#[test]
fn scenario_d_existing_import_is_not_duplicated() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let content = format!("{}\nif (c === \"snacks\") {{}}\n", NESTED);
    write(root, "utils/snacks.ts", &content);

    let report = sweep(root, false);
    assert_eq!(report.updated_count(), 1);
    assert!(!report.updated[0].import_added);

    let out = read(root, "utils/snacks.ts");
    assert_eq!(out.matches("import { CATEGORIES }").count(), 1);
    assert!(out.contains("c === CATEGORIES.snacks"));
}

#[test]
fn scenario_e_excluded_files_are_untouched() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let literal = "if (c === \"grains\") {}\n";
    write(root, "build/bundle.ts", literal);
    write(root, "node_modules/pkg/index.ts", literal);
    write(
        root,
        "core/constants/categories.ts",
        "export const CATEGORIES = { grains: \"grains\" };\nf(\"grains\");\n",
    );
    write(root, "pages/Grains.tsx", literal);

    let report = sweep(root, false);
    assert_eq!(report.scanned, 1);
    assert_eq!(report.updated_count(), 1);
    assert_eq!(report.updated[0].path, "pages/Grains.tsx");

    assert_eq!(read(root, "build/bundle.ts"), literal);
    assert_eq!(read(root, "node_modules/pkg/index.ts"), literal);
    assert!(read(root, "core/constants/categories.ts").contains("f(\"grains\")"));
}

#[test]
fn other_extensions_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "legacy.js", "x === \"fats\";\n");

    let report = sweep(root, false);
    assert_eq!(report.scanned, 0);
    assert_eq!(read(root, "legacy.js"), "x === \"fats\";\n");
}

#[test]
fn second_run_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "pages/A.tsx", "import a from \"a\";\nf(\"others\");\n");
    write(root, "tests/b.test.ts", &format!("expect(all).toEqual({});\n", FULL_LIST));

    let first = sweep(root, false);
    assert_eq!(first.updated_count(), 2);
    let a = read(root, "pages/A.tsx");
    let b = read(root, "tests/b.test.ts");

    let second = sweep(root, false);
    assert_eq!(second.updated_count(), 0);
    assert_eq!(read(root, "pages/A.tsx"), a);
    assert_eq!(read(root, "tests/b.test.ts"), b);
}

#[test]
fn dry_run_writes_nothing_and_reports_diff() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let content = "import a from \"a\";\nf(\"legumes\");\n";
    write(root, "premium/plan.ts", content);

    let report = sweep(root, true);
    assert!(report.dry_run);
    assert_eq!(report.updated_count(), 1);
    let diff = report.updated[0].diff.as_deref().unwrap();
    assert!(diff.starts_with("--- a/premium/plan.ts\n+++ b/premium/plan.ts\n"));
    assert!(diff.contains(&format!("+{}\n", NESTED)));
    assert!(diff.contains("+f(CATEGORIES.legumes);\n"));

    assert_eq!(read(root, "premium/plan.ts"), content);
}

#[test]
fn unreadable_file_is_reported_and_batch_continues() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join("a_binary.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    write(root, "b.ts", "x === \"carbs\";\n");

    let report = sweep(root, false);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, "a_binary.ts");
    assert!(report.failed[0].error.contains("a_binary.ts"));
    assert_eq!(report.updated_count(), 1);
    assert_eq!(report.updated[0].path, "b.ts");
}

#[test]
fn categories_loaded_from_constant_table_source() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "src/core/constants/categories.ts",
        "export const CATEGORIES = {\n  meat: \"meat\",\n  fish: \"fish\",\n} as const;\n",
    );
    write(root, "src/a.ts", "if (c === \"fish\" || c === \"protein\") {}\n");
    write(
        root,
        "tagsweep.toml",
        "[constants]\nsource = \"src/core/constants/categories.ts\"\n",
    );

    let config = Config::discover(None, root).unwrap();
    let sweeper = Sweeper::from_config(&config, root).unwrap();
    let report = sweeper
        .run(&config.root_dir(root), &config.selection(), false)
        .unwrap();

    assert_eq!(report.updated_count(), 1);
    let out = read(root, "src/a.ts");
    assert!(out.contains("c === CATEGORIES.fish"));
    assert!(out.contains("c === \"protein\""));
}

#[test]
fn missing_constant_table_source_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.constants.source = Some("does/not/exist.ts".into());
    let err = Sweeper::from_config(&config, tmp.path()).unwrap_err();
    assert!(err.to_string().contains("exist.ts"));
}

use apidoc_from_source::{
    cli::{self, CliArgs},
    config::GeneratorConfig,
    parser::CSharpParser,
    report::{ApplicationReport, Endpoint, Resolution},
    scanner::FileScanner,
};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDER_EXAMPLE: &str = concat!(
    r#"{"Status": 0, "Total": 0, "PlacedAt": "2023-08-01T20:42:56.710Z", "Previous": {}, "#,
    r#""Lines": [{"Sku": "string", "Quantity": 0}], "Id": "string"}"#
);

/// Helper function to create a temporary source tree
fn create_source_tree(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn crm_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Crm/Crm.Api/Controllers/CustomersController.cs",
            include_str!("fixtures/CustomersController.cs"),
        ),
        ("Crm/Crm.Api/Models/Customer.cs", include_str!("fixtures/Customer.cs")),
    ]
}

fn shop_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Shop/Shop.Api/Controllers/OrdersController.cs",
            include_str!("fixtures/OrdersController.cs"),
        ),
        ("Shop/Shop.Domain/Orders.cs", include_str!("fixtures/Orders.cs")),
    ]
}

/// Scan, parse and extract every application below `root`
fn generate(root: &Path, config: &GeneratorConfig) -> Vec<ApplicationReport> {
    let scan_result = FileScanner::new(root.to_path_buf()).scan().expect("Failed to scan");
    let mut parser = CSharpParser::new(config).expect("Failed to create parser");
    scan_result
        .applications
        .iter()
        .map(|app| cli::generate_application(&mut parser, app, config).expect("Failed to generate"))
        .collect()
}

fn endpoint<'a>(report: &'a ApplicationReport, method_name: &str) -> &'a Endpoint {
    report
        .endpoints()
        .find(|e| e.method_name == method_name)
        .unwrap_or_else(|| panic!("No endpoint {}", method_name))
}

#[test]
fn test_customers_end_to_end() {
    let temp_dir = create_source_tree(crm_files());
    let reports = generate(temp_dir.path(), &GeneratorConfig::default());

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.application_name, "Crm");
    assert_eq!(report.endpoint_count(), 1);

    let rows = report.rows();
    assert_eq!(rows[0].route, "/Customers/GetAll");
    assert_eq!(rows[0].http_method, "HttpGet");
    assert_eq!(rows[0].request_example, "{}");
    assert_eq!(rows[0].response_example, "[{\"Id\": 0, \"Name\": \"string\"}]");
}

#[test]
fn test_orders_cross_project_resolution() {
    let temp_dir = create_source_tree(shop_files());
    let reports = generate(temp_dir.path(), &GeneratorConfig::default());
    let report = &reports[0];

    let names: Vec<&str> = report.endpoints().map(|e| e.method_name.as_str()).collect();
    assert_eq!(names, vec!["List", "Get", "Create", "Delete", "Recent"]);

    let list = endpoint(report, "List");
    assert_eq!(list.route, "/api/Orders");
    assert_eq!(list.request_example, "{}");
    assert_eq!(list.response_example, format!("[{}]", ORDER_EXAMPLE));

    let get = endpoint(report, "Get");
    assert_eq!(get.route, "/api/Orders/{id}");
    assert_eq!(get.request_example, "{}");
    assert_eq!(get.response_example, ORDER_EXAMPLE);

    let create = endpoint(report, "Create");
    assert_eq!(create.http_method, "HttpPost");
    assert_eq!(create.route, "/api/Orders");
    assert_eq!(
        create.request_example,
        r#"{"CustomerId": 0, "Lines": [{"Sku": "string", "Quantity": 0}]}"#
    );
    assert_eq!(
        create.response_example,
        format!(r#"{{"Items": [{}], "Total": 0}}"#, ORDER_EXAMPLE)
    );
    assert_eq!(
        create.parameters[0].resolution,
        Resolution::Symbol {
            qualified_name: "Shop.Domain.Orders.CreateOrder".to_string(),
            project: "Shop.Domain".to_string(),
        }
    );
    assert_eq!(create.parameters[1].resolution, Resolution::Unresolved);

    let delete = endpoint(report, "Delete");
    assert_eq!(delete.http_method, "HttpDelete");
    assert_eq!(delete.route, "/api/Orders/{id}");
    assert_eq!(delete.response_example, "{}");

    let recent = endpoint(report, "Recent");
    assert_eq!(recent.route, "\"api/orders/recent\"");
    assert_eq!(recent.response_example, format!("[{}]", ORDER_EXAMPLE));
}

#[test]
fn test_cli_writes_one_report_per_application() {
    let mut files = crm_files();
    files.extend(shop_files());
    files.push(("Tools/Tools.Lib/Helper.cs", "namespace Tools { public class Helper { } }"));
    let temp_dir = create_source_tree(files);
    let out_dir = temp_dir.path().join("docs");

    let args = CliArgs::parse_from([
        "apidoc-from-source",
        temp_dir.path().to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
    ]);
    cli::run(args).expect("Run failed");

    let crm = fs::read_to_string(out_dir.join("Crm.md")).expect("Crm report missing");
    assert!(crm.starts_with("# Crm\n"));
    assert!(crm.contains("| Route | HTTP Method | Request Object | Response Object |"));
    assert!(crm.contains("| /Customers/GetAll | HttpGet | {} | [{\"Id\": 0, \"Name\": \"string\"}] |"));

    let shop = fs::read_to_string(out_dir.join("Shop.md")).expect("Shop report missing");
    assert_eq!(shop.lines().count(), 2 + 2 + 5);

    // No endpoints, no report
    assert!(!out_dir.join("Tools.md").exists());
}

#[test]
fn test_cli_json_output() {
    let temp_dir = create_source_tree(crm_files());

    let args = CliArgs::parse_from(["apidoc-from-source", temp_dir.path().to_str().unwrap(), "-f", "json"]);
    cli::run(args).expect("Run failed");

    let json = fs::read_to_string(temp_dir.path().join("Crm.json")).expect("JSON report missing");
    let report: ApplicationReport = serde_json::from_str(&json).expect("Invalid JSON report");
    assert_eq!(report.projects[0].project_name, "Crm.Api");
    assert_eq!(report.projects[0].controllers[0].controller_name, "CustomersController");
    assert_eq!(report.endpoint_count(), 1);
}

#[test]
fn test_strict_names_skip_only_the_ambiguous_application() {
    let mut files = crm_files();
    files.push(("Dup/A/Thing.cs", "namespace Dup { public class Thing { } }"));
    files.push(("Dup/B/Thing.cs", "namespace Dup { public class Thing { } }"));
    let temp_dir = create_source_tree(files);

    let args = CliArgs::parse_from([
        "apidoc-from-source",
        temp_dir.path().to_str().unwrap(),
        "--strict-names",
        "-f",
        "yaml",
    ]);
    cli::run(args).expect("Run failed");

    assert!(temp_dir.path().join("Crm.yaml").exists());
    assert!(!temp_dir.path().join("Dup.yaml").exists());
}

#[test]
fn test_merge_mode_from_config_file() {
    let controller = r#"
namespace Shop.Api
{
    [Route("[controller]")]
    public class NotesController : Controller
    {
        [HttpPut("{id}")]
        public ActionResult<bool> Update(int id, Note note, Tag tag) { return true; }
    }

    public class Note { public string Text { get; set; } }
    public class Tag { public string Label { get; set; } }
}
"#;
    let temp_dir = create_source_tree(vec![("Notes/Api/NotesController.cs", controller)]);

    let last_wins = generate(temp_dir.path(), &GeneratorConfig::default());
    let update = endpoint(&last_wins[0], "Update");
    assert_eq!(update.route, "/Notes/{id}");
    assert_eq!(update.request_example, r#"{"Label": "string"}"#);
    assert_eq!(update.response_example, "true");

    let config = GeneratorConfig::from_yaml_str("request_mode: merge").unwrap();
    let merged = generate(temp_dir.path(), &config);
    assert_eq!(
        endpoint(&merged[0], "Update").request_example,
        r#"{"note": {"Text": "string"}, "tag": {"Label": "string"}}"#
    );
}

//! OpenAPI 3.0 documents for both HTTP surfaces.
//!
//! The CRUD service document is fixed; the gateway document is derived from
//! the compiled route table. Each is served under `/swagger/` next to a
//! Swagger UI page.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::config::validation::capture_name;
use crate::employees::SearchField;
use crate::routing::RouteTable;

/// Where the JSON document is served.
pub const DOC_PATH: &str = "/swagger/doc.json";
/// Where the Swagger UI page is served.
pub const UI_PATH: &str = "/swagger/index.html";

/// OpenAPI 3.0 document.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApiSpec {
    pub openapi: String,
    pub info: OpenApiInfo,
    pub paths: BTreeMap<String, OpenApiPathItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<OpenApiComponents>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Operations of one path, keyed by lower-case method.
pub type OpenApiPathItem = BTreeMap<String, OpenApiOperation>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiOperation {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub operation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<OpenApiParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<OpenApiRequestBody>,
    pub responses: BTreeMap<String, OpenApiResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub schema: OpenApiSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiRequestBody {
    pub required: bool,
    pub content: BTreeMap<String, OpenApiMediaType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiResponse {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, OpenApiMediaType>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiMediaType {
    pub schema: OpenApiSchema,
}

/// A schema object; an empty one (`{}`) accepts anything.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, OpenApiSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<OpenApiSchema>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub write_only: bool,
}

impl OpenApiSchema {
    fn of(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    fn formatted(schema_type: &str, format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::of(schema_type)
        }
    }

    fn reference(component: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", component)),
            ..Self::default()
        }
    }

    fn array(items: OpenApiSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of("array")
        }
    }

    fn object(properties: &[(&str, OpenApiSchema)], required: &[&str]) -> Self {
        Self {
            properties: properties
                .iter()
                .map(|(name, schema)| (name.to_string(), schema.clone()))
                .collect(),
            required: required.iter().map(|r| r.to_string()).collect(),
            ..Self::of("object")
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OpenApiComponents {
    pub schemas: BTreeMap<String, OpenApiSchema>,
}

/// OpenAPI document builder.
pub struct OpenApiSpecBuilder {
    info: OpenApiInfo,
    paths: BTreeMap<String, OpenApiPathItem>,
    schemas: BTreeMap<String, OpenApiSchema>,
}

impl OpenApiSpecBuilder {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            info: OpenApiInfo {
                title: title.to_string(),
                version: version.to_string(),
                description: None,
            },
            paths: BTreeMap::new(),
            schemas: BTreeMap::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.info.description = Some(description.to_string());
        self
    }

    /// Add a named component schema.
    pub fn schema(mut self, name: &str, schema: OpenApiSchema) -> Self {
        self.schemas.insert(name.to_string(), schema);
        self
    }

    /// Add one operation; operations on the same path share its item.
    pub fn operation(mut self, path: &str, method: &Method, operation: OpenApiOperation) -> Self {
        self.paths
            .entry(path.to_string())
            .or_default()
            .insert(method.as_str().to_ascii_lowercase(), operation);
        self
    }

    pub fn build(self) -> OpenApiSpec {
        OpenApiSpec {
            openapi: "3.0.3".to_string(),
            info: self.info,
            paths: self.paths,
            components: if self.schemas.is_empty() {
                None
            } else {
                Some(OpenApiComponents {
                    schemas: self.schemas,
                })
            },
        }
    }
}

fn json_content(schema: OpenApiSchema) -> BTreeMap<String, OpenApiMediaType> {
    BTreeMap::from([("application/json".to_string(), OpenApiMediaType { schema })])
}

fn respond(description: &str, schema: OpenApiSchema) -> OpenApiResponse {
    OpenApiResponse {
        description: description.to_string(),
        content: Some(json_content(schema)),
    }
}

fn failure(description: &str) -> OpenApiResponse {
    respond(description, OpenApiSchema::reference("Error"))
}

fn path_param(name: &str, schema: OpenApiSchema, description: &str) -> OpenApiParameter {
    OpenApiParameter {
        name: name.to_string(),
        location: "path".to_string(),
        description: Some(description.to_string()),
        required: true,
        schema,
    }
}

fn operation(
    id: &str,
    summary: &str,
    tag: &str,
    responses: Vec<(&str, OpenApiResponse)>,
) -> OpenApiOperation {
    OpenApiOperation {
        summary: summary.to_string(),
        description: None,
        operation_id: id.to_string(),
        tags: vec![tag.to_string()],
        parameters: Vec::new(),
        request_body: None,
        responses: responses
            .into_iter()
            .map(|(status, response)| (status.to_string(), response))
            .collect(),
    }
}

fn error_schema() -> OpenApiSchema {
    OpenApiSchema::object(&[("error", OpenApiSchema::of("string"))], &["error"])
}

/// Document of the direct CRUD service.
pub fn service_document() -> OpenApiSpec {
    let employee = OpenApiSchema::object(
        &[
            (
                "id",
                OpenApiSchema {
                    read_only: true,
                    ..OpenApiSchema::formatted("integer", "int64")
                },
            ),
            ("firstName", OpenApiSchema::of("string")),
            ("lastName", OpenApiSchema::of("string")),
            ("email", OpenApiSchema::formatted("string", "email")),
            (
                "password",
                OpenApiSchema {
                    write_only: true,
                    ..OpenApiSchema::of("string")
                },
            ),
            ("role", OpenApiSchema::of("string")),
        ],
        &["firstName", "lastName", "email", "password", "role"],
    );
    let message = OpenApiSchema::object(&[("message", OpenApiSchema::of("string"))], &["message"]);
    let created = OpenApiSchema::object(
        &[
            ("message", OpenApiSchema::of("string")),
            ("id", OpenApiSchema::formatted("integer", "int64")),
        ],
        &["message", "id"],
    );
    let health = OpenApiSchema::object(
        &[
            ("status", OpenApiSchema::of("string")),
            ("version", OpenApiSchema::of("string")),
        ],
        &["status", "version"],
    );

    let id_param = || {
        path_param(
            "id",
            OpenApiSchema::formatted("integer", "int64"),
            "Employee ID",
        )
    };
    let employee_body = || OpenApiRequestBody {
        required: true,
        content: json_content(OpenApiSchema::reference("Employee")),
    };
    let one = || OpenApiSchema::reference("Employee");
    let many = || OpenApiSchema::array(OpenApiSchema::reference("Employee"));

    let search_field = OpenApiSchema {
        allowed: SearchField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
        ..OpenApiSchema::of("string")
    };

    OpenApiSpecBuilder::new("Employee service", env!("CARGO_PKG_VERSION"))
        .description("CRUD operations over the employee collection")
        .schema("Employee", employee)
        .schema("Error", error_schema())
        .operation(
            "/employees",
            &Method::GET,
            operation(
                "listEmployees",
                "Get all employees",
                "employees",
                vec![("200", respond("Every employee", many())), ("500", failure("Store failure"))],
            ),
        )
        .operation(
            "/employees",
            &Method::POST,
            OpenApiOperation {
                request_body: Some(employee_body()),
                ..operation(
                    "createEmployee",
                    "Create a new employee",
                    "employees",
                    vec![
                        ("201", respond("Employee created successfully", created)),
                        ("400", failure("Invalid request payload")),
                        ("500", failure("Store failure")),
                    ],
                )
            },
        )
        .operation(
            "/employees/{id}",
            &Method::GET,
            OpenApiOperation {
                parameters: vec![id_param()],
                ..operation(
                    "getEmployee",
                    "Get an employee by ID",
                    "employees",
                    vec![
                        ("200", respond("The employee", one())),
                        ("400", failure("Invalid employee ID")),
                        ("404", failure("Employee not found")),
                        ("500", failure("Store failure")),
                    ],
                )
            },
        )
        .operation(
            "/employees/{id}",
            &Method::PUT,
            OpenApiOperation {
                parameters: vec![id_param()],
                request_body: Some(employee_body()),
                ..operation(
                    "updateEmployee",
                    "Replace an existing employee",
                    "employees",
                    vec![
                        ("200", respond("The stored employee", one())),
                        ("400", failure("Invalid employee ID or payload")),
                        ("404", failure("Employee not found")),
                        ("500", failure("Store failure")),
                    ],
                )
            },
        )
        .operation(
            "/employees/{id}",
            &Method::DELETE,
            OpenApiOperation {
                parameters: vec![id_param()],
                ..operation(
                    "deleteEmployee",
                    "Delete an existing employee",
                    "employees",
                    vec![
                        ("200", respond("Employee deleted successfully", message)),
                        ("400", failure("Invalid employee ID")),
                        ("404", failure("Employee not found")),
                        ("500", failure("Store failure")),
                    ],
                )
            },
        )
        .operation(
            "/employees/search/{field}/{value}",
            &Method::GET,
            OpenApiOperation {
                parameters: vec![
                    path_param("field", search_field, "Field to match on"),
                    path_param("value", OpenApiSchema::of("string"), "Exact value to match"),
                ],
                ..operation(
                    "searchEmployees",
                    "Search employees by field and value",
                    "employees",
                    vec![
                        ("200", respond("Matching employees", many())),
                        ("400", failure("Invalid field or value")),
                        ("500", failure("Store failure")),
                    ],
                )
            },
        )
        .operation(
            "/health",
            &Method::GET,
            operation(
                "health",
                "Service health",
                "health",
                vec![("200", respond("Service is up", health))],
            ),
        )
        .build()
}

/// Document of the forwarding gateway, one operation per configured route.
pub fn gateway_document(table: &RouteTable) -> OpenApiSpec {
    let mut builder = OpenApiSpecBuilder::new("Employee gateway", env!("CARGO_PKG_VERSION"))
        .description("Forwards local routes to remote employee functions")
        .schema("Error", error_schema());

    for route in table.routes() {
        let mut segments = Vec::new();
        let mut parameters = Vec::new();
        for segment in route.path.split('/') {
            match capture_name(segment) {
                Some(name) => {
                    let name = name.trim_start_matches('*');
                    segments.push(format!("{{{}}}", name));
                    parameters.push(path_param(
                        name,
                        OpenApiSchema::of("string"),
                        "Matched locally; not sent to the remote function",
                    ));
                }
                None => segments.push(segment.to_string()),
            }
        }

        let carries_body = !matches!(
            route.method,
            Method::GET | Method::HEAD | Method::DELETE | Method::OPTIONS
        );
        let request_body = carries_body.then(|| OpenApiRequestBody {
            required: false,
            content: BTreeMap::from([(
                "*/*".to_string(),
                OpenApiMediaType {
                    schema: OpenApiSchema::default(),
                },
            )]),
        });

        let op = OpenApiOperation {
            description: Some(format!(
                "Forwarded as {} {}. Headers and body pass through unchanged.",
                route.target.method, route.target.url
            )),
            parameters,
            request_body,
            ..operation(
                &route.target.name,
                &format!("Forward to {}", route.target.name),
                "functions",
                vec![
                    (
                        "default",
                        OpenApiResponse {
                            description: "Response relayed from the remote function".to_string(),
                            content: None,
                        },
                    ),
                    ("500", failure("Forwarding failed")),
                ],
            )
        };
        builder = builder.operation(&segments.join("/"), &route.method, op);
    }

    builder.build()
}

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>API documentation</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "doc.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// Routes serving `spec` and its Swagger UI under `/swagger/`.
pub fn docs_router<S>(spec: OpenApiSpec) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let spec = Arc::new(spec);
    Router::new()
        .route(
            DOC_PATH,
            get(move || {
                let spec = Arc::clone(&spec);
                async move { Json(spec.as_ref().clone()) }
            }),
        )
        .route(UI_PATH, get(|| async { Html(SWAGGER_UI) }))
        .route("/swagger", get(|| async { Redirect::permanent(UI_PATH) }))
        .route("/swagger/", get(|| async { Redirect::permanent(UI_PATH) }))
}

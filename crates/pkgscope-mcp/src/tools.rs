//! Tool definitions exported through tools/list.
//!
//! Schemas are plain JSON Schema objects; the shapes match what the
//! handlers deserialize, so a client that follows the schema never sees
//! an invalid-params error.

use serde::Serialize;

/// One callable tool: name, prose for the model, and an input schema.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Every tool this server exports, in the order clients list them.
pub fn all() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "research_package",
            description: "Research an npm package in depth. Returns:\n\
                - Current vs latest version\n\
                - Weekly downloads, GitHub stars\n\
                - Security advisories\n\
                - Maintenance status (last publish, open issues)\n\
                - TypeScript support\n\
                - License info\n\n\
                Use this when you need to evaluate a package before recommending it.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "package": {
                        "type": "string",
                        "description": "npm package name (e.g., 'react', 'lodash', '@tanstack/query')"
                    },
                    "currentVersion": {
                        "type": "string",
                        "description": "Optional: Current version in use (for comparison)"
                    }
                },
                "required": ["package"]
            }),
        },
        ToolDefinition {
            name: "compare_packages",
            description: "Compare multiple npm packages side-by-side. Returns a comparison with:\n\
                - Downloads, stars, maintenance\n\
                - TypeScript support\n\
                - Last update dates\n\n\
                Use this when helping choose between alternatives.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "packages": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of package names to compare (2-5 packages)",
                        "minItems": 2,
                        "maxItems": 5
                    }
                },
                "required": ["packages"]
            }),
        },
        ToolDefinition {
            name: "find_alternatives",
            description: "Find alternative packages to a given package. Returns:\n\
                - List of alternatives with pros/cons\n\
                - Migration effort estimate\n\
                - Popularity comparison\n\n\
                Use this when a package is deprecated, has security issues, or user wants options.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "package": {
                        "type": "string",
                        "description": "Package to find alternatives for"
                    },
                    "category": {
                        "type": "string",
                        "description": "Optional: Category hint (e.g., 'state-management', 'testing')"
                    }
                },
                "required": ["package"]
            }),
        },
        ToolDefinition {
            name: "check_security",
            description: "Check for security advisories affecting a package or version. Returns:\n\
                - Known vulnerabilities (CVEs)\n\
                - Severity levels\n\
                - Patched versions\n\
                - Recommended actions\n\n\
                Use this before recommending a package or when auditing dependencies.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "package": {
                        "type": "string",
                        "description": "Package name to check"
                    },
                    "version": {
                        "type": "string",
                        "description": "Optional: Specific version to check"
                    }
                },
                "required": ["package"]
            }),
        },
        ToolDefinition {
            name: "analyze_package_json",
            description: "Analyze a package.json file and provide recommendations. Returns:\n\
                - Outdated dependencies\n\
                - Security vulnerabilities\n\
                - Suggested updates with breaking change warnings\n\n\
                Use this to audit a project's dependencies.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "packageJson": {
                        "type": "object",
                        "description": "The package.json content as an object"
                    },
                    "checkDevDeps": {
                        "type": "boolean",
                        "description": "Also analyze devDependencies (default: true)",
                        "default": true
                    }
                },
                "required": ["packageJson"]
            }),
        },
        ToolDefinition {
            name: "get_trending",
            description: "Get trending/popular packages in a category. Returns:\n\
                - Top packages by downloads\n\
                - Rising packages (fast growth)\n\
                - Category recommendations\n\n\
                Categories: state-management, testing, ui-components, date-time, validation, \
                http-client, orm, bundler, css-framework, animation",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Category to search",
                        "enum": pkgscope_core::catalog::category_names()
                    },
                    "framework": {
                        "type": "string",
                        "description": "Optional: Framework context (react, vue, svelte, node)"
                    }
                },
                "required": ["category"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_tools_with_unique_names() {
        let tools = all();
        assert_eq!(tools.len(), 6);

        let mut names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_schemas_are_objects_with_required_fields() {
        for tool in all() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "tool {}", tool.name);
            assert!(
                schema["required"].is_array(),
                "tool {} is missing required list",
                tool.name
            );
        }
    }

    #[test]
    fn test_trending_enum_matches_catalog() {
        let tools = all();
        let trending = tools.iter().find(|t| t.name == "get_trending").unwrap();
        let categories = trending.input_schema["properties"]["category"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(categories.len(), pkgscope_core::catalog::category_names().len());
    }

    #[test]
    fn test_serializes_with_camel_case_schema_key() {
        let json = serde_json::to_value(&all()[0]).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }
}

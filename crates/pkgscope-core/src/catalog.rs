// Hand-curated reference data: substitution candidates, pros/cons text,
// migration effort pairs, category membership, framework filters.
// All of it is immutable and ships with the binary; there is no update
// mechanism and none is planned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Curated substitution candidates for one package, best-first.
struct CatalogEntry {
    package: &'static str,
    alternatives: &'static [&'static str],
}

const ALTERNATIVES: &[CatalogEntry] = &[
    // Date/Time
    CatalogEntry { package: "moment", alternatives: &["date-fns", "dayjs", "luxon"] },
    CatalogEntry { package: "date-fns", alternatives: &["dayjs", "luxon", "moment"] },
    CatalogEntry { package: "dayjs", alternatives: &["date-fns", "luxon", "moment"] },
    // HTTP clients
    CatalogEntry { package: "axios", alternatives: &["ky", "got", "node-fetch", "undici"] },
    CatalogEntry { package: "node-fetch", alternatives: &["undici", "axios", "ky", "got"] },
    CatalogEntry { package: "got", alternatives: &["axios", "ky", "undici"] },
    CatalogEntry { package: "request", alternatives: &["axios", "got", "node-fetch"] },
    // State management
    CatalogEntry { package: "redux", alternatives: &["zustand", "jotai", "recoil", "mobx", "valtio"] },
    CatalogEntry { package: "mobx", alternatives: &["zustand", "redux", "jotai", "valtio"] },
    CatalogEntry { package: "zustand", alternatives: &["jotai", "valtio", "redux"] },
    // Validation
    CatalogEntry { package: "joi", alternatives: &["zod", "yup", "valibot", "ajv"] },
    CatalogEntry { package: "yup", alternatives: &["zod", "joi", "valibot", "ajv"] },
    CatalogEntry { package: "zod", alternatives: &["valibot", "yup", "joi", "ajv"] },
    // Testing
    CatalogEntry { package: "jest", alternatives: &["vitest", "mocha", "ava"] },
    CatalogEntry { package: "mocha", alternatives: &["vitest", "jest", "ava"] },
    CatalogEntry { package: "chai", alternatives: &["vitest", "jest"] },
    // Bundlers
    CatalogEntry { package: "webpack", alternatives: &["vite", "esbuild", "rollup", "parcel"] },
    CatalogEntry { package: "rollup", alternatives: &["vite", "esbuild", "webpack"] },
    CatalogEntry { package: "parcel", alternatives: &["vite", "webpack", "esbuild"] },
    // CSS frameworks
    CatalogEntry { package: "bootstrap", alternatives: &["tailwindcss", "bulma", "foundation"] },
    CatalogEntry { package: "tailwindcss", alternatives: &["unocss", "bootstrap"] },
    // ORM
    CatalogEntry { package: "sequelize", alternatives: &["prisma", "drizzle-orm", "typeorm", "knex"] },
    CatalogEntry { package: "typeorm", alternatives: &["prisma", "drizzle-orm", "sequelize"] },
    CatalogEntry { package: "prisma", alternatives: &["drizzle-orm", "typeorm", "sequelize"] },
    // Utility belts
    CatalogEntry { package: "lodash", alternatives: &["radash", "remeda", "rambda"] },
    CatalogEntry { package: "underscore", alternatives: &["lodash", "radash"] },
    // Server frameworks
    CatalogEntry { package: "express", alternatives: &["fastify", "koa", "hono", "hapi"] },
    CatalogEntry { package: "koa", alternatives: &["fastify", "express", "hono"] },
];

/// Curated substitution candidates for a package, if we have any.
/// Lookup is case-insensitive.
pub fn alternatives_for(package: &str) -> Option<&'static [&'static str]> {
    ALTERNATIVES
        .iter()
        .find(|entry| entry.package.eq_ignore_ascii_case(package))
        .map(|entry| entry.alternatives)
}

struct ProsCons {
    package: &'static str,
    pros: &'static [&'static str],
    cons: &'static [&'static str],
}

const PROS_CONS: &[ProsCons] = &[
    ProsCons {
        package: "date-fns",
        pros: &["Tree-shakeable", "Pure functions", "TypeScript native"],
        cons: &["More verbose than dayjs", "No chainable API"],
    },
    ProsCons {
        package: "dayjs",
        pros: &["Moment-compatible API", "Tiny size (2KB)", "Plugin system"],
        cons: &["Mutable by default", "Fewer locales"],
    },
    ProsCons {
        package: "zod",
        pros: &["TypeScript-first", "Great inference", "Active development"],
        cons: &["Runtime overhead", "Bundle size"],
    },
    ProsCons {
        package: "valibot",
        pros: &["Smallest bundle", "Modular design", "Fast"],
        cons: &["Newer ecosystem", "Fewer utilities"],
    },
    ProsCons {
        package: "vitest",
        pros: &["Vite-native", "ESM first", "Fast", "Jest compatible"],
        cons: &["Newer than Jest", "Some Jest plugins incompatible"],
    },
    ProsCons {
        package: "zustand",
        pros: &["Tiny (1KB)", "No boilerplate", "TypeScript native"],
        cons: &["Less ecosystem than Redux", "Different patterns"],
    },
    ProsCons {
        package: "prisma",
        pros: &["Type-safe queries", "Migrations", "Studio GUI"],
        cons: &["Cold starts", "Query engine overhead"],
    },
    ProsCons {
        package: "drizzle-orm",
        pros: &["SQL-like syntax", "No codegen", "Edge ready", "Lightweight"],
        cons: &["Newer ecosystem", "Less documentation"],
    },
    ProsCons {
        package: "vite",
        pros: &["Lightning fast HMR", "ESM native", "Simple config"],
        cons: &["Different from Webpack patterns", "Some plugins incompatible"],
    },
    ProsCons {
        package: "fastify",
        pros: &["High performance", "Schema validation", "Plugin system"],
        cons: &["Different middleware pattern", "Learning curve from Express"],
    },
];

/// Curated pros/cons text for a candidate, with a generic fallback for
/// packages we have no notes on.
pub fn pros_cons_for(package: &str) -> (Vec<String>, Vec<String>) {
    match PROS_CONS
        .iter()
        .find(|entry| entry.package.eq_ignore_ascii_case(package))
    {
        Some(entry) => (
            entry.pros.iter().map(|s| s.to_string()).collect(),
            entry.cons.iter().map(|s| s.to_string()).collect(),
        ),
        None => (
            vec!["Popular choice".to_string()],
            vec!["Evaluate fit for your use case".to_string()],
        ),
    }
}

/// Coarse, curated estimate of the cost of switching packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationEffort {
    Low,
    Medium,
    High,
}

impl fmt::Display for MigrationEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MigrationEffort::Low => "low",
            MigrationEffort::Medium => "medium",
            MigrationEffort::High => "high",
        };
        write!(f, "{}", label)
    }
}

// Rough estimates based on API similarity between the pair
const LOW_EFFORT_PAIRS: &[(&str, &str)] = &[
    ("moment", "dayjs"),
    ("axios", "ky"),
    ("lodash", "radash"),
    ("jest", "vitest"),
];

const HIGH_EFFORT_PAIRS: &[(&str, &str)] = &[
    ("redux", "zustand"),
    ("webpack", "vite"),
    ("sequelize", "prisma"),
    ("express", "fastify"),
];

/// Migration effort between two packages, checked in both directions.
/// Pairs we have no data on default to medium.
pub fn migration_effort(from: &str, to: &str) -> MigrationEffort {
    let matches = |a: &str, b: &str| {
        (from.eq_ignore_ascii_case(a) && to.eq_ignore_ascii_case(b))
            || (from.eq_ignore_ascii_case(b) && to.eq_ignore_ascii_case(a))
    };

    if LOW_EFFORT_PAIRS.iter().any(|(a, b)| matches(a, b)) {
        MigrationEffort::Low
    } else if HIGH_EFFORT_PAIRS.iter().any(|(a, b)| matches(a, b)) {
        MigrationEffort::High
    } else {
        MigrationEffort::Medium
    }
}

struct Category {
    name: &'static str,
    packages: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "state-management",
        packages: &[
            "zustand",
            "jotai",
            "valtio",
            "redux",
            "@reduxjs/toolkit",
            "recoil",
            "mobx",
            "xstate",
        ],
    },
    Category {
        name: "testing",
        packages: &[
            "vitest",
            "jest",
            "@testing-library/react",
            "playwright",
            "cypress",
            "mocha",
            "ava",
        ],
    },
    Category {
        name: "ui-components",
        packages: &[
            "@radix-ui/react-dialog",
            "@headlessui/react",
            "@chakra-ui/react",
            "@mantine/core",
            "antd",
            "@mui/material",
            "shadcn-ui",
        ],
    },
    Category {
        name: "date-time",
        packages: &["date-fns", "dayjs", "luxon", "moment", "tempo", "@internationalized/date"],
    },
    Category {
        name: "validation",
        packages: &["zod", "yup", "valibot", "ajv", "joi", "superstruct"],
    },
    Category {
        name: "http-client",
        packages: &["axios", "ky", "got", "undici", "ofetch", "wretch"],
    },
    Category {
        name: "orm",
        packages: &[
            "prisma",
            "drizzle-orm",
            "typeorm",
            "sequelize",
            "knex",
            "kysely",
            "mikro-orm",
        ],
    },
    Category {
        name: "bundler",
        packages: &["vite", "esbuild", "rollup", "webpack", "parcel", "turbopack", "tsup"],
    },
    Category {
        name: "css-framework",
        packages: &[
            "tailwindcss",
            "unocss",
            "bootstrap",
            "bulma",
            "styled-components",
            "@emotion/react",
        ],
    },
    Category {
        name: "animation",
        packages: &[
            "framer-motion",
            "react-spring",
            "@react-spring/web",
            "gsap",
            "animejs",
            "motion",
        ],
    },
];

/// Representative packages for a category, if the category is known.
pub fn category_packages(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(category))
        .map(|c| c.packages)
}

/// Every recognized category name, for error messages and tool schemas.
pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

struct FrameworkFilter {
    name: &'static str,
    prefixes: &'static [&'static str],
}

const FRAMEWORKS: &[FrameworkFilter] = &[
    FrameworkFilter { name: "react", prefixes: &["react-", "@react-", "use-"] },
    FrameworkFilter { name: "vue", prefixes: &["vue-", "@vue/", "vueuse"] },
    FrameworkFilter { name: "svelte", prefixes: &["svelte-", "@svelte/"] },
    // node has no identifying prefix, so no filter
    FrameworkFilter { name: "node", prefixes: &[] },
];

/// Identifying substrings for a framework, if the framework is known.
/// An empty slice means "recognized, but don't filter".
pub fn framework_prefixes(framework: &str) -> Option<&'static [&'static str]> {
    FRAMEWORKS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(framework))
        .map(|f| f.prefixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternatives_lookup_is_case_insensitive() {
        assert!(alternatives_for("moment").is_some());
        assert!(alternatives_for("Moment").is_some());
        assert!(alternatives_for("MOMENT").is_some());
        assert!(alternatives_for("left-pad").is_none());
    }

    #[test]
    fn test_pros_cons_fallback() {
        let (pros, cons) = pros_cons_for("dayjs");
        assert!(pros.contains(&"Moment-compatible API".to_string()));
        assert_eq!(cons.len(), 2);

        let (pros, cons) = pros_cons_for("some-unknown-thing");
        assert_eq!(pros, vec!["Popular choice".to_string()]);
        assert_eq!(cons, vec!["Evaluate fit for your use case".to_string()]);
    }

    #[test]
    fn test_migration_effort_both_directions() {
        assert_eq!(migration_effort("moment", "dayjs"), MigrationEffort::Low);
        assert_eq!(migration_effort("dayjs", "moment"), MigrationEffort::Low);
        assert_eq!(migration_effort("redux", "zustand"), MigrationEffort::High);
        assert_eq!(migration_effort("zustand", "redux"), MigrationEffort::High);
        assert_eq!(migration_effort("moment", "luxon"), MigrationEffort::Medium);
    }

    #[test]
    fn test_category_lookup() {
        assert!(category_packages("state-management").is_some());
        assert!(category_packages("validation").is_some());
        assert!(category_packages("blockchain").is_none());
        assert_eq!(category_names().len(), 10);
    }

    #[test]
    fn test_framework_prefixes() {
        assert_eq!(framework_prefixes("react").map(|p| p.len()), Some(3));
        // node is recognized but carries no filter
        assert_eq!(framework_prefixes("node").map(|p| p.len()), Some(0));
        assert!(framework_prefixes("angular").is_none());
    }
}

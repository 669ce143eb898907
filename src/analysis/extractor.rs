//! Decorator metadata extraction.
//!
//! Walks one file's syntax tree, finds the class carrying `@Module(...)` and
//! turns its configuration object into a [`ModuleRecord`]. Extraction is
//! best-effort: malformed elements degrade to empty lists or placeholder
//! names and are reported through [`Extraction::skipped`], never as errors.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};
use tree_sitter::Node;

use super::resolver::{decorator_arguments, SymbolResolver};
use crate::parser::syntax::{line_of, named_children, SyntaxTree};
use crate::parser::types::{
    Facet, ImportRecord, ModuleRecord, NameGenerator, ProviderKind, ProviderRecord, SkipReason,
    SkippedElement,
};

/// Name of the module-declaring decorator.
pub const MODULE_DECORATOR: &str = "Module";

/// Name of the deferred-reference wrapper.
pub const FORWARD_REF: &str = "forwardRef";

/// Callees whose single array argument lists entities.
pub const FEATURE_REGISTRATION_CALLEES: &[&str] = &[
    "TypeOrmModule.forFeature",
    "MongooseModule.forFeature",
    "SequelizeModule.forFeature",
];

/// Callees whose object argument carries an `entities` array.
pub const ROOT_REGISTRATION_CALLEES: &[&str] = &["TypeOrmModule.forRoot"];

/// Class-name substrings that mark decoy module declarations.
pub const DEFAULT_DECOY_NAMES: &[&str] = &["Mock", "Fake", "Stub"];

/// Result of extracting one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub module: ModuleRecord,
    /// Elements dropped or replaced by placeholders, in source order.
    pub skipped: Vec<SkippedElement>,
}

/// Extracts module metadata from parsed files.
///
/// A parser owns its placeholder [`NameGenerator`] and two caches that only
/// ever contain what this instance parsed itself: modules by name and each
/// provider's direct dependencies. Use one parser per file to keep analyses
/// independent.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use nestscope::analysis::ModuleParser;
/// use nestscope::parser::SyntaxTree;
///
/// let source = r#"
/// import { Module } from '@nestjs/common';
/// import { UsersModule } from './users/users.module';
///
/// @Module({ imports: [UsersModule], controllers: [AppController] })
/// export class AppModule {}
/// "#;
/// let tree = SyntaxTree::parse(source, Path::new("app.module.ts")).unwrap();
/// let extraction = ModuleParser::new().parse(&tree).unwrap();
///
/// assert_eq!(extraction.module.name, "AppModule");
/// assert_eq!(extraction.module.imports[0].name, "UsersModule");
/// assert_eq!(extraction.module.controllers, vec!["AppController"]);
/// ```
#[derive(Debug, Clone)]
pub struct ModuleParser {
    names: NameGenerator,
    decoy_names: Vec<String>,
    module_cache: IndexMap<String, ModuleRecord>,
    provider_cache: HashMap<String, Vec<String>>,
}

impl Default for ModuleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleParser {
    pub fn new() -> Self {
        Self::with_decoy_names(DEFAULT_DECOY_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// Create a parser with a custom decoy denylist.
    pub fn with_decoy_names(decoy_names: Vec<String>) -> Self {
        Self {
            names: NameGenerator::new(),
            decoy_names,
            module_cache: IndexMap::new(),
            provider_cache: HashMap::new(),
        }
    }

    /// Extract and enrich the module declared in `tree`.
    ///
    /// Returns `None` when the file declares no qualifying module class.
    pub fn parse(&mut self, tree: &SyntaxTree) -> Option<Extraction> {
        let mut extraction = self.extract(tree)?;
        self.remember(&extraction.module);
        self.enrich(&mut extraction.module);
        Some(extraction)
    }

    /// Extract the module declared in `tree` without second-pass enrichment.
    ///
    /// Import and provider dependency lists hold only what the source states
    /// directly.
    pub fn extract(&mut self, tree: &SyntaxTree) -> Option<Extraction> {
        let resolver = SymbolResolver::new(tree);
        let file_path = Some(tree.path().display().to_string());

        let class = resolver.classes().into_iter().find(|class| {
            class.has_decorator(tree, MODULE_DECORATOR)
                && class.name.is_some_and(|name| !self.is_decoy(name))
        });
        let Some(class) = class else {
            debug!(file = %tree.path().display(), "no module declaration found");
            return None;
        };

        let mut skipped = Vec::new();
        let decorator = class.decorator(tree, MODULE_DECORATOR)?;
        let config = decorator_arguments(decorator).and_then(|args| {
            named_children(args)
                .into_iter()
                .next()
                .filter(|arg| arg.kind() == "object")
        });

        let Some(config) = config else {
            let name = self.names.next_placeholder();
            debug!(
                file = %tree.path().display(),
                class = class.name.unwrap_or_default(),
                placeholder = %name,
                "module decorator has no configuration object"
            );
            skipped.push(SkippedElement {
                facet: Facet::Decorator,
                node_kind: decorator.kind().to_string(),
                reason: SkipReason::MissingArguments,
                line: line_of(decorator),
                placeholder: Some(name.clone()),
            });
            return Some(Extraction {
                module: ModuleRecord::new(name, file_path),
                skipped,
            });
        };

        let fields = object_fields(tree, config);
        let mut elements = |facet: Facet| array_elements(&fields, facet, &mut skipped);
        let import_nodes = elements(Facet::Imports);
        let export_nodes = elements(Facet::Exports);
        let provider_nodes = elements(Facet::Providers);
        let controller_nodes = elements(Facet::Controllers);

        let mut module = ModuleRecord::new(class.name.unwrap_or_default(), file_path);

        for node in &import_nodes {
            let import = self.import_element(&resolver, tree, *node, &mut skipped);
            module.imports.push(import);
        }

        for node in &provider_nodes {
            if let Some(provider) = provider_element(&resolver, tree, *node, &mut skipped) {
                module.providers.push(provider);
            }
        }

        module.exports = identifier_list(tree, &export_nodes, Facet::Exports, &mut skipped);
        module.controllers =
            identifier_list(tree, &controller_nodes, Facet::Controllers, &mut skipped);

        module.entity_count = import_nodes
            .iter()
            .chain(provider_nodes.iter())
            .map(|node| entity_count(tree, *node))
            .sum();

        debug!(
            file = %tree.path().display(),
            module = %module.name,
            imports = module.imports.len(),
            providers = module.providers.len(),
            skipped = skipped.len(),
            "extracted module"
        );

        Some(Extraction { module, skipped })
    }

    fn is_decoy(&self, name: &str) -> bool {
        self.decoy_names
            .iter()
            .any(|decoy| !decoy.is_empty() && name.contains(decoy.as_str()))
    }

    fn import_element(
        &mut self,
        resolver: &SymbolResolver<'_>,
        tree: &SyntaxTree,
        node: Node<'_>,
        skipped: &mut Vec<SkippedElement>,
    ) -> ImportRecord {
        match node.kind() {
            "identifier" => {
                let name = tree.text(node);
                ImportRecord::simple(name, resolver.resolve_import_path(name))
            }
            "call_expression" => match call_import_target(tree, node) {
                Some((name, is_forward_reference)) => {
                    ImportRecord::call(name, resolver.resolve_import_path(name), is_forward_reference)
                }
                None => self.placeholder_import(node, skipped),
            },
            _ => self.placeholder_import(node, skipped),
        }
    }

    fn placeholder_import(
        &mut self,
        node: Node<'_>,
        skipped: &mut Vec<SkippedElement>,
    ) -> ImportRecord {
        let name = self.names.next_placeholder();
        trace!(kind = node.kind(), placeholder = %name, "unrecognized import element");
        skipped.push(SkippedElement {
            facet: Facet::Imports,
            node_kind: node.kind().to_string(),
            reason: SkipReason::UnrecognizedImport,
            line: line_of(node),
            placeholder: Some(name.clone()),
        });
        ImportRecord::placeholder(name)
    }

    fn remember(&mut self, module: &ModuleRecord) {
        for provider in &module.providers {
            self.provider_cache
                .insert(provider.name.clone(), provider.dependencies.clone());
        }
        self.module_cache.insert(module.name.clone(), module.clone());
    }

    /// Second pass over a freshly extracted module, limited to this parser's
    /// own caches.
    fn enrich(&self, module: &mut ModuleRecord) {
        for import in &mut module.imports {
            if let Some(target) = self.module_cache.get(&import.name) {
                let names: IndexSet<String> = target
                    .imports
                    .iter()
                    .map(|i| i.name.clone())
                    .chain(target.providers.iter().map(|p| p.name.clone()))
                    .collect();
                import.dependencies = names.into_iter().collect();
            }
        }

        for provider in &mut module.providers {
            provider.dependencies = self
                .dependency_closure(&provider.name, &provider.dependencies)
                .into_iter()
                .collect();
        }
    }

    /// Names reachable from `root` through the provider cache.
    ///
    /// Iterative depth-first walk. A name already expanded contributes
    /// nothing further, so mutual references terminate instead of recursing.
    pub fn dependency_closure(&self, root: &str, direct: &[String]) -> IndexSet<String> {
        let mut expanded: HashSet<&str> = HashSet::from([root]);
        let mut reachable = IndexSet::new();
        let mut stack: Vec<&str> = direct.iter().rev().map(String::as_str).collect();

        while let Some(name) = stack.pop() {
            reachable.insert(name.to_string());
            if !expanded.insert(name) {
                continue;
            }
            if let Some(deps) = self.provider_cache.get(name) {
                stack.extend(deps.iter().rev().map(String::as_str));
            }
        }

        reachable
    }
}

/// `key -> value` pairs of an object literal. Later keys overwrite earlier ones.
fn object_fields<'t>(tree: &'t SyntaxTree, object: Node<'t>) -> HashMap<&'t str, Node<'t>> {
    named_children(object)
        .into_iter()
        .filter(|child| child.kind() == "pair")
        .filter_map(|pair| {
            let key = pair.child_by_field_name("key")?;
            let value = pair.child_by_field_name("value")?;
            Some((tree.unquoted(key), value))
        })
        .collect()
}

fn array_elements<'t>(
    fields: &HashMap<&str, Node<'t>>,
    facet: Facet,
    skipped: &mut Vec<SkippedElement>,
) -> Vec<Node<'t>> {
    let key = facet.to_string();
    match fields.get(key.as_str()) {
        Some(value) if value.kind() == "array" => named_children(*value),
        Some(value) => {
            skipped.push(SkippedElement {
                facet,
                node_kind: value.kind().to_string(),
                reason: SkipReason::NotAnArray,
                line: line_of(*value),
                placeholder: None,
            });
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Module name and forward-reference flag for an import written as a call.
///
/// `forwardRef(() => X)` yields `(X, true)`; any other call yields the root
/// of its callee, so `ConfigModule.forRoot({..})` yields `ConfigModule`.
fn call_import_target<'t>(tree: &'t SyntaxTree, call: Node<'t>) -> Option<(&'t str, bool)> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() == "identifier" && tree.text(callee) == FORWARD_REF {
        let args = call.child_by_field_name("arguments")?;
        return forward_ref_target(tree, args).map(|name| (name, true));
    }
    callee_root(tree, callee).map(|name| (name, false))
}

fn forward_ref_target<'t>(tree: &'t SyntaxTree, args: Node<'t>) -> Option<&'t str> {
    let children = named_children(args);
    let [func] = children.as_slice() else {
        return None;
    };
    let func = *func;
    if !matches!(func.kind(), "arrow_function" | "function_expression" | "function") {
        return None;
    }
    let body = func.child_by_field_name("body")?;
    let returned = match body.kind() {
        "statement_block" => named_children(body)
            .into_iter()
            .find(|stmt| stmt.kind() == "return_statement")
            .and_then(|ret| named_children(ret).into_iter().next())?,
        _ => body,
    };
    (returned.kind() == "identifier").then(|| tree.text(returned))
}

/// Leftmost identifier of a member/call chain.
fn callee_root<'t>(tree: &'t SyntaxTree, mut node: Node<'t>) -> Option<&'t str> {
    loop {
        node = match node.kind() {
            "identifier" => return Some(tree.text(node)),
            "member_expression" => node.child_by_field_name("object")?,
            "call_expression" => node.child_by_field_name("function")?,
            _ => return None,
        };
    }
}

fn provider_element(
    resolver: &SymbolResolver<'_>,
    tree: &SyntaxTree,
    node: Node<'_>,
    skipped: &mut Vec<SkippedElement>,
) -> Option<ProviderRecord> {
    let provider = match node.kind() {
        "identifier" => {
            let name = tree.text(node);
            Some(class_provider(resolver, name))
        }
        "object" => provider_from_object(resolver, tree, node),
        _ => {
            skipped.push(SkippedElement {
                facet: Facet::Providers,
                node_kind: node.kind().to_string(),
                reason: SkipReason::UnrecognizedProvider,
                line: line_of(node),
                placeholder: None,
            });
            return None;
        }
    };

    if provider.is_none() {
        skipped.push(SkippedElement {
            facet: Facet::Providers,
            node_kind: node.kind().to_string(),
            reason: SkipReason::MissingProvide,
            line: line_of(node),
            placeholder: None,
        });
    }
    provider
}

fn class_provider(resolver: &SymbolResolver<'_>, class_name: &str) -> ProviderRecord {
    let dependencies = resolver
        .find_class_declaration(class_name)
        .map(|class| resolver.extract_constructor_dependencies(&class))
        .unwrap_or_default();
    ProviderRecord::class(
        class_name,
        dependencies,
        resolver.is_class_injectable(class_name),
    )
}

/// `{ provide, useClass | useFactory | useValue, inject }` provider objects.
fn provider_from_object(
    resolver: &SymbolResolver<'_>,
    tree: &SyntaxTree,
    object: Node<'_>,
) -> Option<ProviderRecord> {
    let fields = object_fields(tree, object);

    let provide = fields.get("provide").and_then(|value| match value.kind() {
        "string" | "identifier" => Some(tree.unquoted(*value).to_string()),
        _ => None,
    })?;

    let raw = |key: &str| fields.get(key).map(|value| tree.text(*value).to_string());
    let inject = fields.get("inject").map(|value| {
        if value.kind() == "array" {
            named_children(*value)
                .into_iter()
                .map(|token| tree.unquoted(token).to_string())
                .collect()
        } else {
            Vec::new()
        }
    });
    let use_class = fields
        .get("useClass")
        .map(|value| tree.unquoted(*value).to_string());

    let (kind, dependencies, is_injectable) = if let Some(class_name) = &use_class {
        let class = class_provider(resolver, class_name);
        (ProviderKind::Class, class.dependencies, class.is_injectable)
    } else if fields.contains_key("useFactory") {
        (ProviderKind::Factory, inject.clone().unwrap_or_default(), false)
    } else {
        // useValue, or no recognized binding at all.
        (ProviderKind::Value, Vec::new(), false)
    };

    Some(ProviderRecord {
        name: provide.clone(),
        kind,
        dependencies,
        is_injectable,
        provide: Some(provide),
        use_class,
        use_value: raw("useValue"),
        use_factory: raw("useFactory"),
        inject,
    })
}

fn identifier_list(
    tree: &SyntaxTree,
    nodes: &[Node<'_>],
    facet: Facet,
    skipped: &mut Vec<SkippedElement>,
) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| {
            if node.kind() == "identifier" {
                return Some(tree.text(*node).to_string());
            }
            skipped.push(SkippedElement {
                facet,
                node_kind: node.kind().to_string(),
                reason: SkipReason::NotAnIdentifier,
                line: line_of(*node),
                placeholder: None,
            });
            None
        })
        .collect()
}

/// Entities registered by a recognized ORM call, 0 for anything else.
///
/// Matches the callee text exactly; nothing is evaluated.
pub fn entity_count(tree: &SyntaxTree, node: Node<'_>) -> usize {
    if node.kind() != "call_expression" {
        return 0;
    }
    let Some(callee) = node
        .child_by_field_name("function")
        .filter(|callee| callee.kind() == "member_expression")
    else {
        return 0;
    };
    let Some(first_arg) = node
        .child_by_field_name("arguments")
        .and_then(|args| named_children(args).into_iter().next())
    else {
        return 0;
    };

    let callee = tree.text(callee);
    if FEATURE_REGISTRATION_CALLEES.contains(&callee) && first_arg.kind() == "array" {
        return named_children(first_arg).len();
    }
    if ROOT_REGISTRATION_CALLEES.contains(&callee) && first_arg.kind() == "object" {
        return object_fields(tree, first_arg)
            .get("entities")
            .filter(|entities| entities.kind() == "array")
            .map(|entities| named_children(*entities).len())
            .unwrap_or(0);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn tree(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, Path::new("src/app.module.ts")).unwrap()
    }

    fn parse(source: &str) -> Option<Extraction> {
        ModuleParser::new().parse(&tree(source))
    }

    fn extract(source: &str) -> Option<Extraction> {
        ModuleParser::new().extract(&tree(source))
    }

    // ===== Module Discovery =====

    #[test]
    fn test_no_module_class() {
        let source = r#"
@Injectable()
export class UsersService {}
"#;
        assert!(parse(source).is_none());
    }

    #[test]
    fn test_decoy_module_is_skipped() {
        let source = r#"
@Module({ providers: [A] })
export class MockAppModule {}

@Module({ providers: [B] })
export class RealModule {}
"#;
        let extraction = parse(source).unwrap();
        assert_eq!(extraction.module.name, "RealModule");
        assert_eq!(extraction.module.providers[0].name, "B");
    }

    #[test]
    fn test_only_first_module_is_extracted() {
        let source = r#"
@Module({})
export class FirstModule {}

@Module({})
export class SecondModule {}
"#;
        assert_eq!(parse(source).unwrap().module.name, "FirstModule");
    }

    #[test]
    fn test_custom_decoy_names() {
        let source = "@Module({}) export class TestingModule {}";
        let mut parser = ModuleParser::with_decoy_names(vec!["Testing".to_string()]);
        assert!(parser.parse(&tree(source)).is_none());
    }

    #[test]
    fn test_module_without_arguments_gets_placeholder() {
        let extraction = parse("@Module() export class AppModule {}").unwrap();

        assert_eq!(extraction.module.name, "UnknownModule_0");
        assert_eq!(
            extraction.module.file_path.as_deref(),
            Some("src/app.module.ts")
        );
        assert!(extraction.module.imports.is_empty());
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].reason, SkipReason::MissingArguments);
    }

    #[test]
    fn test_non_array_fields_yield_empty_lists() {
        let source = r#"
const shared = [A];
@Module({ imports: shared, providers: [B] })
export class AppModule {}
"#;
        let extraction = parse(source).unwrap();

        assert!(extraction.module.imports.is_empty());
        assert_eq!(extraction.module.providers.len(), 1);
        assert_eq!(extraction.skipped[0].facet, Facet::Imports);
        assert_eq!(extraction.skipped[0].reason, SkipReason::NotAnArray);
    }

    // ===== Imports =====

    #[test]
    fn test_identifier_imports() {
        let source = r#"
import { UsersModule } from './users/users.module';
import { HttpModule } from '@nestjs/axios';

@Module({ imports: [UsersModule, HttpModule, OrphanModule] })
export class AppModule {}
"#;
        let module = extract(source).unwrap().module;

        assert_eq!(module.imports.len(), 3);
        assert_eq!(module.imports[0].path.as_deref(), Some("./users/users.module"));
        assert_eq!(module.imports[1].path.as_deref(), Some("axios"));
        assert_eq!(module.imports[2].path, None);
        for import in &module.imports {
            assert!(!import.is_async);
            assert!(!import.is_forward_reference);
            assert!(import.dependencies.is_empty());
            assert!(import.module.is_none());
        }
    }

    #[test]
    fn test_configured_module_import() {
        let source = r#"
import { ConfigModule } from '@nestjs/config';

@Module({
  imports: [
    ConfigModule.forRoot({ isGlobal: true }),
    CacheModule.register().withDefaults(),
  ],
})
export class AppModule {}
"#;
        let module = extract(source).unwrap().module;

        assert_eq!(module.imports[0].name, "ConfigModule");
        assert_eq!(module.imports[0].path.as_deref(), Some("config"));
        assert!(module.imports[0].is_async);
        assert!(!module.imports[0].is_forward_reference);
        assert_eq!(module.imports[1].name, "CacheModule");
    }

    #[test]
    fn test_forward_reference_import() {
        let source = r#"
import { CatsModule } from '../cats/cats.module';

@Module({
  imports: [
    forwardRef(() => CatsModule),
    forwardRef(() => { return DogsModule; }),
  ],
})
export class OwnersModule {}
"#;
        let module = extract(source).unwrap().module;

        assert_eq!(module.imports[0].name, "CatsModule");
        assert_eq!(module.imports[0].path.as_deref(), Some("../cats/cats.module"));
        assert!(module.imports[0].is_async);
        assert!(module.imports[0].is_forward_reference);
        assert_eq!(module.imports[1].name, "DogsModule");
        assert!(module.imports[1].is_forward_reference);
    }

    #[test]
    fn test_unrecognized_imports_get_unique_placeholders() {
        let source = r#"
@Module({
  imports: [...shared, forwardRef(() => lazy.Module), 'StringModule', UsersModule],
})
export class AppModule {}
"#;
        let extraction = extract(source).unwrap();
        let names: Vec<_> = extraction
            .module
            .imports
            .iter()
            .map(|i| i.name.as_str())
            .collect();

        assert_eq!(
            names,
            vec!["UnknownModule_0", "UnknownModule_1", "UnknownModule_2", "UsersModule"]
        );
        assert_eq!(extraction.skipped.len(), 3);
        assert!(extraction
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::UnrecognizedImport));
    }

    // ===== Providers =====

    #[test]
    fn test_class_provider_dependencies() {
        let source = r#"
@Injectable()
export class UsersService {
  constructor(private repo: UsersRepository, private config: ConfigService) {}
}

@Module({ providers: [UsersService, ExternalService] })
export class UsersModule {}
"#;
        let module = extract(source).unwrap().module;

        let users = &module.providers[0];
        assert_eq!(users.kind, ProviderKind::Class);
        assert_eq!(users.dependencies, vec!["UsersRepository", "ConfigService"]);
        assert!(users.is_injectable);

        let external = &module.providers[1];
        assert!(external.dependencies.is_empty());
        assert!(!external.is_injectable);
    }

    #[test]
    fn test_object_provider_kinds() {
        let source = r#"
class PgDriver {
  constructor(pool: Pool) {}
}

@Module({
  providers: [
    { provide: 'DRIVER', useClass: PgDriver },
    { provide: CONFIG, useFactory: (env) => load(env), inject: [EnvService, 'RAW'] },
    { provide: 'VERSION', useValue: '1.0' },
    { provide: 'BOTH', useFactory: make, useValue: 1 },
  ],
})
export class DbModule {}
"#;
        let providers = extract(source).unwrap().module.providers;

        assert_eq!(providers[0].name, "DRIVER");
        assert_eq!(providers[0].kind, ProviderKind::Class);
        assert_eq!(providers[0].dependencies, vec!["Pool"]);
        assert_eq!(providers[0].use_class.as_deref(), Some("PgDriver"));
        assert!(!providers[0].is_injectable);

        assert_eq!(providers[1].name, "CONFIG");
        assert_eq!(providers[1].kind, ProviderKind::Factory);
        assert_eq!(providers[1].dependencies, vec!["EnvService", "RAW"]);
        assert_eq!(providers[1].use_factory.as_deref(), Some("(env) => load(env)"));
        assert_eq!(
            providers[1].inject,
            Some(vec!["EnvService".to_string(), "RAW".to_string()])
        );

        assert_eq!(providers[2].kind, ProviderKind::Value);
        assert_eq!(providers[2].use_value.as_deref(), Some("'1.0'"));
        assert!(providers[2].dependencies.is_empty());

        assert_eq!(providers[3].kind, ProviderKind::Factory);
        assert!(providers[3].dependencies.is_empty());
    }

    #[test]
    fn test_provider_without_provide_is_dropped() {
        let source = r#"
@Module({
  providers: [
    A,
    { useValue: 1 },
    { provide: 'B', useValue: 2 },
    { provide: tokens.C, useValue: 3 },
  ],
})
export class AppModule {}
"#;
        let extraction = extract(source).unwrap();
        let names: Vec<_> = extraction
            .module
            .providers
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(names, vec!["A", "B"]);
        let dropped: Vec<_> = extraction
            .skipped
            .iter()
            .filter(|s| s.reason == SkipReason::MissingProvide)
            .collect();
        assert_eq!(dropped.len(), 2);
    }

    // ===== Exports / Controllers =====

    #[test]
    fn test_exports_and_controllers_keep_identifiers_only() {
        let source = r#"
@Module({
  controllers: [UsersController, 'legacy'],
  exports: [UsersService, TypeOrmModule.forFeature([User])],
})
export class UsersModule {}
"#;
        let extraction = extract(source).unwrap();

        assert_eq!(extraction.module.controllers, vec!["UsersController"]);
        assert_eq!(extraction.module.exports, vec!["UsersService"]);
        assert_eq!(
            extraction
                .skipped
                .iter()
                .filter(|s| s.reason == SkipReason::NotAnIdentifier)
                .count(),
            2
        );
    }

    // ===== Entity Count =====

    #[test]
    fn test_entity_count_recognized_forms() {
        let source = r#"
@Module({
  imports: [
    TypeOrmModule.forFeature([User, Profile, Photo]),
    TypeOrmModule.forRoot({ type: 'postgres', entities: [User, Profile] }),
    MongooseModule.forFeature([{ name: Cat.name, schema: CatSchema }]),
    SomethingElse.forFeature([A, B]),
    TypeOrmModule.forFeature(entities),
  ],
})
export class DataModule {}
"#;
        assert_eq!(extract(source).unwrap().module.entity_count, 6);
    }

    #[test]
    fn test_entity_count_unrecognized_is_zero() {
        let source = r#"
@Module({ imports: [ConfigModule.forRoot({ entities: [A, B] })] })
export class AppModule {}
"#;
        assert_eq!(extract(source).unwrap().module.entity_count, 0);
    }

    // ===== Enrichment =====

    #[test]
    fn test_provider_closure_through_cache() {
        let source = r#"
@Module({
  providers: [
    { provide: 'A', useFactory: f, inject: ['B'] },
    { provide: 'B', useFactory: f, inject: ['C'] },
    { provide: 'C', useFactory: f, inject: ['A'] },
    { provide: 'D', useFactory: f, inject: ['E'] },
  ],
})
export class CycleModule {}
"#;
        let providers = parse(source).unwrap().module.providers;

        assert_eq!(providers[0].dependencies, vec!["B", "C", "A"]);
        assert_eq!(providers[1].dependencies, vec!["C", "A", "B"]);
        assert_eq!(providers[3].dependencies, vec!["E"]);
    }

    #[test]
    fn test_self_import_enrichment_uses_module_cache() {
        let source = r#"
@Module({ imports: [SelfModule, Other], providers: [P] })
export class SelfModule {}
"#;
        let module = parse(source).unwrap().module;

        assert_eq!(module.imports[0].dependencies, vec!["SelfModule", "Other", "P"]);
        assert!(module.imports[1].dependencies.is_empty());
    }

    #[test]
    fn test_dependency_closure_is_iterative() {
        let mut parser = ModuleParser::new();
        for i in 0..10_000 {
            parser
                .provider_cache
                .insert(format!("P{}", i), vec![format!("P{}", i + 1)]);
        }

        let closure = parser.dependency_closure("root", &["P0".to_string()]);
        assert_eq!(closure.len(), 10_001);
        assert_eq!(closure.first().map(String::as_str), Some("P0"));
    }
}

//! File-local symbol resolution.
//!
//! Maps identifiers used inside a module decorator back to the import
//! statement that brought them into scope, and reads constructor parameter
//! types off class declarations. Everything here is syntactic and never
//! looks beyond the current file.

use tree_sitter::Node;

use crate::parser::syntax::{named_children, SyntaxTree};

/// Name of the injectable marker decorator.
pub const INJECTABLE_DECORATOR: &str = "Injectable";

/// Package root whose specifiers are shortened to their last segment.
pub const FRAMEWORK_PACKAGE_ROOT: &str = "@nestjs/";

/// A top-level class declaration and the decorators attached to it.
#[derive(Debug, Clone)]
pub struct ClassDeclaration<'t> {
    pub node: Node<'t>,
    pub name: Option<&'t str>,
    /// Decorators on the class itself and on an enclosing `export` statement.
    pub decorators: Vec<Node<'t>>,
}

impl<'t> ClassDeclaration<'t> {
    /// Returns the first decorator named `name`.
    pub fn decorator(&self, tree: &'t SyntaxTree, name: &str) -> Option<Node<'t>> {
        self.decorators
            .iter()
            .copied()
            .find(|d| decorator_name(tree, *d) == Some(name))
    }

    pub fn has_decorator(&self, tree: &'t SyntaxTree, name: &str) -> bool {
        self.decorator(tree, name).is_some()
    }
}

/// Name a decorator is invoked by: `@Foo`, `@Foo()`, `@ns.Foo()` all yield `Foo`.
pub fn decorator_name<'t>(tree: &'t SyntaxTree, decorator: Node<'t>) -> Option<&'t str> {
    let expr = named_children(decorator).into_iter().next()?;
    let target = match expr.kind() {
        "call_expression" => expr.child_by_field_name("function")?,
        _ => expr,
    };
    match target.kind() {
        "identifier" => Some(tree.text(target)),
        "member_expression" => target
            .child_by_field_name("property")
            .map(|p| tree.text(p)),
        _ => None,
    }
}

/// The argument list of a decorator written in call form.
pub fn decorator_arguments(decorator: Node<'_>) -> Option<Node<'_>> {
    let expr = named_children(decorator).into_iter().next()?;
    if expr.kind() != "call_expression" {
        return None;
    }
    expr.child_by_field_name("arguments")
}

/// Resolves symbols within a single parsed file.
pub struct SymbolResolver<'t> {
    tree: &'t SyntaxTree,
}

impl<'t> SymbolResolver<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self { tree }
    }

    /// All top-level class declarations in source order.
    pub fn classes(&self) -> Vec<ClassDeclaration<'t>> {
        let mut classes = Vec::new();

        for node in named_children(self.tree.root()) {
            match node.kind() {
                "class_declaration" | "abstract_class_declaration" => {
                    classes.push(self.class_declaration(node, Vec::new()));
                }
                "export_statement" => {
                    let outer: Vec<Node<'t>> = named_children(node)
                        .into_iter()
                        .filter(|c| c.kind() == "decorator")
                        .collect();
                    let declaration = node
                        .child_by_field_name("declaration")
                        .or_else(|| node.child_by_field_name("value"));
                    if let Some(decl) = declaration {
                        if is_class_kind(decl.kind()) {
                            classes.push(self.class_declaration(decl, outer));
                        }
                    }
                }
                _ => {}
            }
        }

        classes
    }

    fn class_declaration(&self, node: Node<'t>, mut decorators: Vec<Node<'t>>) -> ClassDeclaration<'t> {
        decorators.extend(
            named_children(node)
                .into_iter()
                .filter(|c| c.kind() == "decorator"),
        );
        ClassDeclaration {
            node,
            name: node.child_by_field_name("name").map(|n| self.tree.text(n)),
            decorators,
        }
    }

    /// Finds the import statement that binds `identifier` and returns its
    /// module specifier.
    ///
    /// Default, named (either side of `as`) and namespace bindings are all
    /// considered. Framework specifiers such as `@nestjs/common` are shortened
    /// to `common`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use nestscope::analysis::SymbolResolver;
    /// use nestscope::parser::SyntaxTree;
    ///
    /// let tree = SyntaxTree::parse(
    ///     "import { UsersModule } from './users/users.module';",
    ///     Path::new("app.module.ts"),
    /// ).unwrap();
    /// let resolver = SymbolResolver::new(&tree);
    /// assert_eq!(resolver.resolve_import_path("UsersModule").as_deref(), Some("./users/users.module"));
    /// assert_eq!(resolver.resolve_import_path("Other"), None);
    /// ```
    pub fn resolve_import_path(&self, identifier: &str) -> Option<String> {
        named_children(self.tree.root())
            .into_iter()
            .filter(|node| node.kind() == "import_statement")
            .find(|node| self.import_binds(*node, identifier))
            .and_then(|node| node.child_by_field_name("source"))
            .map(|source| normalize_specifier(self.tree.unquoted(source)))
    }

    fn import_binds(&self, import: Node<'t>, identifier: &str) -> bool {
        let Some(clause) = named_children(import)
            .into_iter()
            .find(|c| c.kind() == "import_clause")
        else {
            return false;
        };

        named_children(clause).into_iter().any(|binding| match binding.kind() {
            // import Foo from '...'
            "identifier" => self.tree.text(binding) == identifier,
            // import * as Foo from '...'
            "namespace_import" => named_children(binding)
                .into_iter()
                .any(|n| n.kind() == "identifier" && self.tree.text(n) == identifier),
            // import { Foo, Bar as Baz } from '...'
            "named_imports" => named_children(binding)
                .into_iter()
                .filter(|s| s.kind() == "import_specifier")
                .any(|spec| {
                    ["name", "alias"].iter().any(|field| {
                        spec.child_by_field_name(field)
                            .is_some_and(|n| self.tree.text(n) == identifier)
                    })
                }),
            _ => false,
        })
    }

    /// Linear scan of top-level classes for one named `name`.
    pub fn find_class_declaration(&self, name: &str) -> Option<ClassDeclaration<'t>> {
        self.classes().into_iter().find(|c| c.name == Some(name))
    }

    /// Type names of the first constructor's parameters, in parameter order.
    ///
    /// Only parameters annotated with a named type contribute; primitives,
    /// unions, inline object types and unannotated parameters are skipped.
    pub fn extract_constructor_dependencies(&self, class: &ClassDeclaration<'t>) -> Vec<String> {
        let Some(body) = class.node.child_by_field_name("body") else {
            return Vec::new();
        };

        let constructor = named_children(body).into_iter().find(|member| {
            member.kind() == "method_definition"
                && member
                    .child_by_field_name("name")
                    .is_some_and(|n| self.tree.text(n) == "constructor")
        });
        let Some(params) = constructor.and_then(|c| c.child_by_field_name("parameters")) else {
            return Vec::new();
        };

        named_children(params)
            .into_iter()
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .filter_map(|p| p.child_by_field_name("type"))
            .filter_map(|annotation| named_children(annotation).into_iter().next())
            .filter_map(|ty| self.named_type(ty))
            .collect()
    }

    fn named_type(&self, ty: Node<'t>) -> Option<String> {
        match ty.kind() {
            "type_identifier" | "nested_type_identifier" => Some(self.tree.text(ty).to_string()),
            // Repository<User> -> Repository
            "generic_type" => ty
                .child_by_field_name("name")
                .map(|n| self.tree.text(n).to_string()),
            _ => None,
        }
    }

    /// True iff the class named `name` is declared here and carries `@Injectable`.
    pub fn is_class_injectable(&self, name: &str) -> bool {
        self.find_class_declaration(name)
            .is_some_and(|c| c.has_decorator(self.tree, INJECTABLE_DECORATOR))
    }
}

fn is_class_kind(kind: &str) -> bool {
    matches!(kind, "class_declaration" | "abstract_class_declaration" | "class")
}

/// Shortens framework specifiers to their final path segment.
pub fn normalize_specifier(specifier: &str) -> String {
    if specifier.starts_with(FRAMEWORK_PACKAGE_ROOT) {
        specifier
            .rsplit('/')
            .next()
            .unwrap_or(specifier)
            .to_string()
    } else {
        specifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, Path::new("test.module.ts")).unwrap()
    }

    #[test]
    fn test_resolve_named_import() {
        let tree = parse(
            r#"
import { Module } from '@nestjs/common';
import { UsersModule } from './users/users.module';
"#,
        );
        let resolver = SymbolResolver::new(&tree);

        assert_eq!(
            resolver.resolve_import_path("UsersModule").as_deref(),
            Some("./users/users.module")
        );
        assert_eq!(resolver.resolve_import_path("Module").as_deref(), Some("common"));
    }

    #[test]
    fn test_resolve_default_namespace_and_alias() {
        let tree = parse(
            r#"
import Auth from './auth.module';
import * as Db from './db';
import { Cache as CacheLayer } from './cache.module';
"#,
        );
        let resolver = SymbolResolver::new(&tree);

        assert_eq!(resolver.resolve_import_path("Auth").as_deref(), Some("./auth.module"));
        assert_eq!(resolver.resolve_import_path("Db").as_deref(), Some("./db"));
        assert_eq!(
            resolver.resolve_import_path("CacheLayer").as_deref(),
            Some("./cache.module")
        );
        assert_eq!(resolver.resolve_import_path("Missing"), None);
    }

    #[test]
    fn test_normalize_specifier() {
        assert_eq!(normalize_specifier("@nestjs/typeorm"), "typeorm");
        assert_eq!(normalize_specifier("@nestjs/config/dist/x"), "x");
        assert_eq!(normalize_specifier("@other/pkg"), "@other/pkg");
        assert_eq!(normalize_specifier("./local"), "./local");
    }

    #[test]
    fn test_classes_include_exported_decorators() {
        let tree = parse(
            r#"
@Injectable()
export class UsersService {}

@Injectable()
class Helper {}

export default class Plain {}
"#,
        );
        let resolver = SymbolResolver::new(&tree);
        let classes = resolver.classes();

        let names: Vec<_> = classes.iter().filter_map(|c| c.name).collect();
        assert_eq!(names, vec!["UsersService", "Helper", "Plain"]);
        assert!(resolver.is_class_injectable("UsersService"));
        assert!(resolver.is_class_injectable("Helper"));
        assert!(!resolver.is_class_injectable("Plain"));
        assert!(!resolver.is_class_injectable("Nowhere"));
    }

    #[test]
    fn test_constructor_dependencies() {
        let tree = parse(
            r#"
@Injectable()
export class UsersService {
  private readonly count = 0;

  constructor(
    private readonly repo: Repository<User>,
    private config: ConfigService,
    @Inject('TOKEN') private token: string,
    logger,
    private opts: { verbose: boolean },
    private mailer?: mail.Mailer,
  ) {}

  constructor(other: Ignored) {}
}
"#,
        );
        let resolver = SymbolResolver::new(&tree);
        let class = resolver.find_class_declaration("UsersService").unwrap();

        assert_eq!(
            resolver.extract_constructor_dependencies(&class),
            vec!["Repository", "ConfigService", "mail.Mailer"]
        );
    }

    #[test]
    fn test_class_without_constructor() {
        let tree = parse("export class Empty { run() {} }");
        let resolver = SymbolResolver::new(&tree);
        let class = resolver.find_class_declaration("Empty").unwrap();

        assert!(resolver.extract_constructor_dependencies(&class).is_empty());
    }

    #[test]
    fn test_decorator_name_forms() {
        let tree = parse(
            r#"
@Module
@common.Global()
export class A {}
"#,
        );
        let resolver = SymbolResolver::new(&tree);
        let class = resolver.find_class_declaration("A").unwrap();

        let names: Vec<_> = class
            .decorators
            .iter()
            .filter_map(|d| decorator_name(&tree, *d))
            .collect();
        assert_eq!(names, vec!["Module", "Global"]);
        assert!(decorator_arguments(class.decorators[0]).is_none());
        assert!(decorator_arguments(class.decorators[1]).is_some());
    }
}

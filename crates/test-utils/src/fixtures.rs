//! Common source-file fixtures.

use jsts_syntax::{AstNode, OffsetRange, SourceFile, VisitorKeys};

fn if_statement(range: OffsetRange, test: OffsetRange, block: OffsetRange) -> AstNode {
    AstNode::new("IfStatement", range)
        .with_child("test", AstNode::new("Identifier", test))
        .with_child("consequent", AstNode::new("BlockStatement", block))
}

/// `if (a) {} else if (b) {}`: an if/else-if chain with empty blocks
/// and no final else
pub fn chain_without_else_file() -> SourceFile {
    let text = "if (a) {} else if (b) {}";
    let inner = if_statement(
        OffsetRange::new(15, 24),
        OffsetRange::new(19, 20),
        OffsetRange::new(22, 24),
    );
    let outer = if_statement(
        OffsetRange::new(0, 24),
        OffsetRange::new(4, 5),
        OffsetRange::new(7, 9),
    )
    .with_child("alternate", inner);
    let program = AstNode::new("Program", OffsetRange::new(0, 24)).with_list("body", vec![outer]);
    SourceFile::new("chain.js", text, program, VisitorKeys::estree())
}

/// `switch (a) { case 1: switch (b) { case 2: break; } }`
pub fn nested_switch_file() -> SourceFile {
    let text = "switch (a) { case 1: switch (b) { case 2: break; } }";
    let inner_case = AstNode::new("SwitchCase", OffsetRange::new(34, 48))
        .with_child("test", AstNode::new("Literal", OffsetRange::new(39, 40)))
        .with_list(
            "consequent",
            vec![AstNode::new("BreakStatement", OffsetRange::new(42, 48))],
        );
    let inner = AstNode::new("SwitchStatement", OffsetRange::new(21, 51))
        .with_child("discriminant", AstNode::new("Identifier", OffsetRange::new(29, 30)))
        .with_list("cases", vec![inner_case]);
    let outer_case = AstNode::new("SwitchCase", OffsetRange::new(13, 51))
        .with_child("test", AstNode::new("Literal", OffsetRange::new(18, 19)))
        .with_list("consequent", vec![inner]);
    let outer = AstNode::new("SwitchStatement", OffsetRange::new(0, 53))
        .with_child("discriminant", AstNode::new("Identifier", OffsetRange::new(8, 9)))
        .with_list("cases", vec![outer_case]);
    let program = AstNode::new("Program", OffsetRange::new(0, 53)).with_list("body", vec![outer]);
    SourceFile::new("nested.js", text, program, VisitorKeys::estree())
}

/// `void doWork();`
pub fn void_call_file() -> SourceFile {
    let text = "void doWork();";
    let call = AstNode::new("CallExpression", OffsetRange::new(5, 13))
        .with_child("callee", AstNode::new("Identifier", OffsetRange::new(5, 11)))
        .with_list("arguments", vec![]);
    let expression = AstNode::new("UnaryExpression", OffsetRange::new(0, 13))
        .with_str("operator", "void")
        .with_bool("prefix", true)
        .with_child("argument", call);
    let statement = AstNode::new("ExpressionStatement", OffsetRange::new(0, 14))
        .with_child("expression", expression);
    let program =
        AstNode::new("Program", OffsetRange::new(0, 14)).with_list("body", vec![statement]);
    SourceFile::new("void.js", text, program, VisitorKeys::estree())
}

/// `function f(a) { if (a) { return 1; } return 2; }`, cyclomatic
/// complexity 2
pub fn branching_function_file() -> SourceFile {
    let text = "function f(a) { if (a) { return 1; } return 2; }";
    let if_statement = AstNode::new("IfStatement", OffsetRange::new(16, 36))
        .with_child("test", AstNode::new("Identifier", OffsetRange::new(20, 21)))
        .with_child(
            "consequent",
            AstNode::new("BlockStatement", OffsetRange::new(23, 36)).with_list(
                "body",
                vec![AstNode::new("ReturnStatement", OffsetRange::new(25, 34))
                    .with_child("argument", AstNode::new("Literal", OffsetRange::new(32, 33)))],
            ),
        );
    let body = AstNode::new("BlockStatement", OffsetRange::new(14, 48)).with_list(
        "body",
        vec![
            if_statement,
            AstNode::new("ReturnStatement", OffsetRange::new(37, 46))
                .with_child("argument", AstNode::new("Literal", OffsetRange::new(44, 45))),
        ],
    );
    let function = AstNode::new("FunctionDeclaration", OffsetRange::new(0, 48))
        .with_child("id", AstNode::new("Identifier", OffsetRange::new(9, 10)))
        .with_list("params", vec![AstNode::new("Identifier", OffsetRange::new(11, 12))])
        .with_child("body", body);
    let program =
        AstNode::new("Program", OffsetRange::new(0, 48)).with_list("body", vec![function]);
    SourceFile::new("branching.js", text, program, VisitorKeys::estree())
}

/// `if (x) {}` built from raw parser JSON, the way an external parser
/// hands trees over
pub fn parser_output_file() -> SourceFile {
    let text = "if (x) {}";
    let json = serde_json::json!({
        "type": "Program",
        "range": [0, 9],
        "body": [{
            "type": "IfStatement",
            "range": [0, 9],
            "test": { "type": "Identifier", "range": [4, 5], "name": "x" },
            "consequent": { "type": "BlockStatement", "range": [7, 9], "body": [] },
            "alternate": null
        }]
    });
    SourceFile::from_parser_output("parsed.js", text, &json.to_string(), VisitorKeys::estree())
        .unwrap_or_else(|error| panic!("fixture JSON must parse: {error}"))
}

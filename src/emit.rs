use crate::block::{BlockContent, BlockKind};
use crate::converter::Converter;
use crate::document::NodeId;
use crate::walk::RenderContext;

impl Converter<'_> {
    /// Render the block `node` and its nested blocks at indentation `depth`.
    pub fn emit(&self, node: NodeId, depth: usize) -> String {
        let mut ctx = RenderContext::at_depth(depth);
        let mut out = String::new();
        self.emit_into(node, &mut ctx, &mut out);
        out
    }

    pub(crate) fn emit_into(&self, node: NodeId, ctx: &mut RenderContext, out: &mut String) {
        let render = self.render();
        if !ctx.enter(node, render.max_depth, render.max_nesting) {
            return;
        }
        self.emit_block(node, ctx, out);
        ctx.leave();
    }

    fn emit_block(&self, node: NodeId, ctx: &mut RenderContext, out: &mut String) {
        let kind = self.classify(node);
        match kind {
            BlockKind::Divider => {
                out.push_str("\n---\n\n");
                return;
            }
            BlockKind::NotABlock => {
                self.walk_children(node, ctx, out);
                return;
            }
            _ => {}
        }

        let content = self.locate(node);
        let depth = ctx.depth;
        let indent = self.render().indent_for(depth);

        if let BlockKind::CodeBlock { language } = &kind {
            self.emit_code(node, language.as_deref(), &indent, out);
            self.emit_nested(&content, depth, ctx, out);
            return;
        }
        if content.own_text.is_empty() && content.nested.is_empty() {
            return;
        }
        let text = &content.own_text;

        match kind {
            BlockKind::Heading(level) => {
                out.push('\n');
                out.push_str(&"#".repeat(level as usize));
                out.push(' ');
                out.push_str(text);
                out.push_str("\n\n");
                self.emit_nested(&content, depth, ctx, out);
            }
            ref item if item.is_list_item() => {
                let marker = match kind {
                    BlockKind::NumberedListItem => "1.",
                    BlockKind::TodoItem { checked: true } => "- [x]",
                    BlockKind::TodoItem { checked: false } => "- [ ]",
                    _ => "-",
                };
                ctx.open_list();
                out.push_str(&format!("{indent}{marker} {text}\n"));
                self.emit_nested(&content, depth + 1, ctx, out);
            }
            BlockKind::ToggleItem => {
                out.push_str(&format!(
                    "\n{indent}<details>\n{indent}<summary>{text}</summary>\n\n"
                ));
                self.emit_nested(&content, depth + 1, ctx, out);
                out.push_str(&format!("{indent}</details>\n\n"));
            }
            BlockKind::Quote => {
                out.push_str(&format!("\n{indent}> {text}\n\n"));
                self.emit_nested(&content, depth, ctx, out);
            }
            BlockKind::Callout { ref icon } => {
                let line = [icon.as_str(), text.as_str()]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push_str(&format!("\n{indent}> {line}\n\n"));
                self.emit_nested(&content, depth, ctx, out);
            }
            BlockKind::GenericText => {
                ctx.close_list(out);
                if !text.is_empty() {
                    out.push_str(&format!("{indent}{text}\n\n"));
                }
                self.emit_nested(&content, depth + 1, ctx, out);
            }
            _ => {}
        }
    }

    /// Fenced code, each line indented to the current depth. Inline markup
    /// is not applied inside the fence.
    fn emit_code(&self, node: NodeId, language: Option<&str>, indent: &str, out: &mut String) {
        let code = self.code_text(node);
        let code = code.trim_end_matches(['\n', '\r']);
        if code.trim().is_empty() {
            return;
        }
        out.push('\n');
        out.push_str(indent);
        out.push_str("```");
        out.push_str(language.unwrap_or_default());
        out.push('\n');
        for line in code.split('\n') {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str("```\n\n");
    }

    fn emit_nested(&self, content: &BlockContent, depth: usize, ctx: &mut RenderContext, out: &mut String) {
        ctx.with_depth(depth, |ctx| {
            for &child in &content.nested {
                if self.is_block(child) {
                    self.emit_into(child, ctx, out);
                } else {
                    self.walk_into(child, ctx, out);
                }
            }
        });
    }
}

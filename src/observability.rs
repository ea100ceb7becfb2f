use crate::model::Identifier;
use crate::plugins::PluggableFile;

/// Indented dump of what is about to be generated, for `--debug`.
///
/// ```text
/// svc
///     Test_Service_Do
///         Service
///             db *sql.DB
///         Do
///             ctx context.Context
///             wantErr require.ErrorAssertionFunc
/// ```
pub fn show_tree(file: &PluggableFile) -> String {
    let mut out = String::new();
    out.push_str(&file.package_name);
    out.push('\n');
    for pf in &file.functions {
        out.push_str(&format!("    {}\n", pf.test_name()));
        if let Some(s) = &pf.func.receiver_struct {
            out.push_str(&format!("        {}\n", s.name));
            push_identifiers(&mut out, &s.fields);
        }
        out.push_str(&format!("        {}\n", pf.func.name));
        push_identifiers(&mut out, &pf.func.args);
        push_identifiers(&mut out, &pf.func.results);
        out.push('\n');
    }
    out
}

fn push_identifiers(out: &mut String, ids: &[Identifier]) {
    for id in ids {
        out.push_str(&format!("            {} {}\n", id.name, id.ty));
    }
}

//! SQL rendering via `fmt::Display` for AST nodes.
//!
//! Rendering is canonical: keywords are upper case, optional noise words are
//! dropped and every parenthesis that was in the source is a node of its own,
//! so `parse(sql).to_string()` re-parses to the same tree.

use std::fmt;

use super::*;
use crate::lexer::Keyword;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn paren_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("(")?;
    comma_list(f, items)?;
    f.write_str(")")
}

/// Returns true if an unquoted rendering of `name` would not lex back to the
/// same identifier.
fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_alphabetic() || first == '_') {
        return true;
    }
    if chars.any(|c| !(c.is_alphanumeric() || c == '_')) {
        return true;
    }
    Keyword::from_str(name).is_some_and(|kw| kw.is_reserved())
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted || needs_quoting(&self.value) {
            write!(f, "\"{}\"", self.value.replace('"', "\"\""))
        } else {
            f.write_str(&self.value)
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::WideDecimal(text) => f.write_str(text),
            Self::Double(v) => write!(f, "{v:e}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Hex(bytes) => {
                f.write_str("X'")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                f.write_str("'")
            }
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Null => f.write_str("NULL"),
            Self::Typed { kind, value } => {
                write!(f, "{} '{}'", kind.as_str(), value.replace('\'', "''"))
            }
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            ParameterStyle::Anonymous => f.write_str("?"),
            ParameterStyle::Positional => write!(f, "${}", self.index + 1),
        }
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::Preceding(n) => write!(f, "{n} PRECEDING"),
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Following(n) => write!(f, "{n} FOLLOWING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.units {
            FrameUnits::Rows => "ROWS ",
            FrameUnits::Range => "RANGE ",
        })?;
        match self.end {
            Some(end) => write!(f, "BETWEEN {} AND {end}", self.start),
            None => write!(f, "{}", self.start),
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(base) = &self.base {
            parts.push(base.to_string());
        }
        if !self.partition_by.is_empty() {
            let exprs: Vec<String> = self.partition_by.iter().map(ToString::to_string).collect();
            parts.push(format!("PARTITION BY {}", exprs.join(", ")));
        }
        if !self.order_by.is_empty() {
            let items: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
            parts.push(format!("ORDER BY {}", items.join(", ")));
        }
        if let Some(frame) = &self.frame {
            parts.push(frame.to_string());
        }
        write!(f, "({})", parts.join(" "))
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, " OVER {name}"),
            Self::Spec(spec) => write!(f, " OVER {spec}"),
        }
    }
}

fn write_over(f: &mut fmt::Formatter<'_>, over: Option<&WindowRef>) -> fmt::Result {
    match over {
        Some(window) => write!(f, "{window}"),
        None => Ok(()),
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        comma_list(f, &self.args)?;
        f.write_str(")")?;
        write_over(f, self.over.as_ref())
    }
}

fn not_prefix(negated: bool) -> &'static str {
    if negated {
        "NOT "
    } else {
        ""
    }
}

impl fmt::Display for Expr {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Column { table, name, .. } => {
                if let Some(table) = table {
                    write!(f, "{table}.")?;
                }
                write!(f, "{name}")
            }
            Self::Parameter(p) => write!(f, "{p}"),
            Self::Binary {
                left, op, right, ..
            } => write!(f, "{left} {} {right}", op.as_str()),
            Self::Unary { op, operand, .. } => {
                let rendered = operand.to_string();
                match op {
                    UnaryOp::Not => write!(f, "NOT {rendered}"),
                    // `- -x` must not collapse into a `--` comment.
                    _ if rendered.starts_with(['-', '+']) => {
                        write!(f, "{} {rendered}", op.as_str())
                    }
                    _ => write!(f, "{}{rendered}", op.as_str()),
                }
            }
            Self::Quantified {
                left,
                op,
                quantifier,
                subquery,
                ..
            } => write!(
                f,
                "{left} {} {} ({subquery})",
                op.as_str(),
                quantifier.as_str()
            ),
            Self::IsNull { expr, negated, .. } => {
                write!(f, "{expr} IS {}NULL", not_prefix(*negated))
            }
            Self::IsBool {
                expr,
                value,
                negated,
                ..
            } => write!(
                f,
                "{expr} IS {}{}",
                not_prefix(*negated),
                if *value { "TRUE" } else { "FALSE" }
            ),
            Self::InList {
                expr,
                list,
                negated,
                ..
            } => {
                write!(f, "{expr} {}IN ", not_prefix(*negated))?;
                paren_list(f, list)
            }
            Self::InSubquery {
                expr,
                subquery,
                negated,
                ..
            } => write!(f, "{expr} {}IN ({subquery})", not_prefix(*negated)),
            Self::Between {
                expr,
                low,
                high,
                negated,
                ..
            } => write!(
                f,
                "{expr} {}BETWEEN {low} AND {high}",
                not_prefix(*negated)
            ),
            Self::Like {
                expr,
                pattern,
                escape,
                negated,
                ..
            } => {
                write!(f, "{expr} {}LIKE {pattern}", not_prefix(*negated))?;
                if let Some(escape) = escape {
                    write!(f, " ESCAPE {escape}")?;
                }
                Ok(())
            }
            Self::Function(call) => write!(f, "{call}"),
            Self::Aggregate {
                func,
                distinct,
                arg,
                over,
                ..
            } => {
                write!(f, "{}(", func.as_str())?;
                if *distinct {
                    f.write_str("DISTINCT ")?;
                }
                write!(f, "{arg})")?;
                write_over(f, over.as_ref())
            }
            Self::CountStar { over, .. } => {
                f.write_str("COUNT(*)")?;
                write_over(f, over.as_ref())
            }
            Self::Trim {
                spec,
                trim_char,
                source,
                ..
            } => write!(f, "TRIM({} {trim_char} FROM {source})", spec.as_str()),
            Self::Case {
                operand,
                when_clauses,
                else_result,
                ..
            } => {
                f.write_str("CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for (condition, result) in when_clauses {
                    write!(f, " WHEN {condition} THEN {result}")?;
                }
                if let Some(else_result) = else_result {
                    write!(f, " ELSE {else_result}")?;
                }
                f.write_str(" END")
            }
            Self::Cast {
                expr, data_type, ..
            } => write!(f, "CAST({expr} AS {data_type})"),
            Self::NullIf { left, right, .. } => write!(f, "NULLIF({left}, {right})"),
            Self::Substring {
                expr,
                start,
                length,
                ..
            } => {
                write!(f, "SUBSTRING({expr} FROM {start}")?;
                if let Some(length) = length {
                    write!(f, " FOR {length}")?;
                }
                f.write_str(")")
            }
            Self::Extract { field, expr, .. } => {
                write!(f, "EXTRACT({} FROM {expr})", field.as_str())
            }
            Self::Exists { subquery, .. } => write!(f, "EXISTS ({subquery})"),
            Self::Subquery { query, .. } => write!(f, "({query})"),
            Self::Row { items, .. } => paren_list(f, items),
            Self::Nested { expr, .. } => write!(f, "({expr})"),
            Self::SpecialRegister { register, .. } => f.write_str(register.as_str()),
            Self::NextValueFor { sequence, .. } => write!(f, "NEXT VALUE FOR {sequence}"),
            Self::Interval { value, unit, .. } => {
                write!(f, "INTERVAL {value} {}", unit.as_str())
            }
            Self::XmlParse { document, .. } => {
                write!(f, "XMLPARSE(DOCUMENT {document} PRESERVE WHITESPACE)")
            }
            Self::XmlSerialize {
                expr, data_type, ..
            } => write!(f, "XMLSERIALIZE({expr} AS {data_type})"),
            Self::XmlExists {
                xquery, passing, ..
            } => write!(
                f,
                "XMLEXISTS('{}' PASSING BY REF {passing})",
                xquery.replace('\'', "''")
            ),
            Self::Default { .. } => f.write_str("DEFAULT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(nulls) = self.nulls {
            write!(f, " {}", nulls.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for RowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{n}"),
            Self::Parameter(p) => write!(f, "{p}"),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {offset} ROWS")?;
        }
        if let Some(fetch) = self.fetch {
            write!(f, " FETCH FIRST {fetch} ROWS ONLY")?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit.count)?;
            if let Some(offset) = limit.offset {
                write!(f, " OFFSET {offset}")?;
            }
        }
        match &self.locking {
            Some(Locking::Update { columns }) => {
                f.write_str(" FOR UPDATE")?;
                if !columns.is_empty() {
                    f.write_str(" OF ")?;
                    comma_list(f, columns)?;
                }
            }
            Some(Locking::ReadOnly) => f.write_str(" FOR READ ONLY")?,
            None => {}
        }
        if let Some(level) = self.isolation {
            write!(f, " WITH {}", level.abbreviation())?;
        }
        Ok(())
    }
}

impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Values { rows, .. } => {
                f.write_str("VALUES ")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    // `VALUES (SELECT ..)` is a one-column row already.
                    match row.as_slice() {
                        [subquery @ Expr::Subquery { .. }] => write!(f, "{subquery}")?,
                        _ => paren_list(f, row)?,
                    }
                }
                Ok(())
            }
            Self::Query(query) => write!(f, "({query})"),
            Self::SetOperation {
                op,
                quantifier,
                left,
                right,
                ..
            } => {
                write!(f, "{left} {}", op.as_str())?;
                match quantifier {
                    SetQuantifier::All => f.write_str(" ALL")?,
                    SetQuantifier::Distinct => f.write_str(" DISTINCT")?,
                    SetQuantifier::None => {}
                }
                write!(f, " {right}")
            }
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard { .. } => f.write_str("*"),
            Self::QualifiedWildcard { qualifier, .. } => write!(f, "{qualifier}.*"),
            Self::Expr { expr, alias } => {
                write!(f, "{expr}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        comma_list(f, &self.projection)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        match &self.group_by {
            Some(GroupBy::Exprs(exprs)) => {
                f.write_str(" GROUP BY ")?;
                comma_list(f, exprs)?;
            }
            Some(GroupBy::Rollup(exprs)) => {
                f.write_str(" GROUP BY ROLLUP ")?;
                paren_list(f, exprs)?;
            }
            None => {}
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        if !self.windows.is_empty() {
            f.write_str(" WINDOW ")?;
            for (i, window) in self.windows.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} AS {}", window.name, window.spec)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for IndexHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.action {
            IndexHintAction::Use => "USE",
            IndexHintAction::Ignore => "IGNORE",
            IndexHintAction::Force => "FORCE",
        })?;
        f.write_str(if self.key { " KEY" } else { " INDEX" })?;
        match self.scope {
            Some(IndexHintScope::Join) => f.write_str(" FOR JOIN")?,
            Some(IndexHintScope::OrderBy) => f.write_str(" FOR ORDER BY")?,
            Some(IndexHintScope::GroupBy) => f.write_str(" FOR GROUP BY")?,
            None => {}
        }
        f.write_str(" ")?;
        paren_list(f, &self.indexes)
    }
}

impl fmt::Display for JoinConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On(expr) => write!(f, " ON {expr}"),
            Self::Using(columns) => {
                f.write_str(" USING ")?;
                paren_list(f, columns)
            }
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table {
                name, alias, hints, ..
            } => {
                write!(f, "{name}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                for hint in hints {
                    write!(f, " {hint}")?;
                }
                Ok(())
            }
            Self::Derived {
                subquery,
                alias,
                columns,
                ..
            } => {
                write!(f, "({subquery})")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                    if !columns.is_empty() {
                        f.write_str(" ")?;
                        paren_list(f, columns)?;
                    }
                }
                Ok(())
            }
            Self::Join(join) => {
                write!(f, "{} ", join.left)?;
                match &join.operator {
                    JoinOperator::Inner(_) => f.write_str("INNER JOIN")?,
                    JoinOperator::Outer { preserved, .. } => {
                        write!(f, "{} OUTER JOIN", preserved.as_str())?;
                    }
                    JoinOperator::Cross => f.write_str("CROSS JOIN")?,
                    JoinOperator::Straight => f.write_str("STRAIGHT_JOIN")?,
                    JoinOperator::Natural(None) => f.write_str("NATURAL JOIN")?,
                    JoinOperator::Natural(Some(side)) => {
                        write!(f, "NATURAL {} OUTER JOIN", side.as_str())?;
                    }
                }
                write!(f, " {}", join.right)?;
                match join.operator.constraint() {
                    Some(constraint) => write!(f, "{constraint}"),
                    None => Ok(()),
                }
            }
            Self::Nested { table, .. } => write!(f, "({table})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, " WHERE {expr}"),
            Self::CurrentOf(cursor) => write!(f, " WHERE CURRENT OF {cursor}"),
        }
    }
}

impl fmt::Display for ForeignKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REFERENCES {}", self.table)?;
        if !self.columns.is_empty() {
            f.write_str(" ")?;
            paren_list(f, &self.columns)?;
        }
        if let Some(action) = self.on_delete {
            write!(f, " ON DELETE {}", action.as_str())?;
        }
        if let Some(action) = self.on_update {
            write!(f, " ON UPDATE {}", action.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnConstraintDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {name} ")?;
        }
        match &self.constraint {
            ColumnConstraint::NotNull => f.write_str("NOT NULL"),
            ColumnConstraint::Default(expr) => write!(f, "DEFAULT {expr}"),
            ColumnConstraint::PrimaryKey => f.write_str("PRIMARY KEY"),
            ColumnConstraint::Unique => f.write_str("UNIQUE"),
            ColumnConstraint::References(fk) => write!(f, "{fk}"),
            ColumnConstraint::Check(expr) => write!(f, "CHECK ({expr})"),
            ColumnConstraint::Identity(IdentityGeneration::Always) => {
                f.write_str("GENERATED ALWAYS AS IDENTITY")
            }
            ColumnConstraint::Identity(IdentityGeneration::ByDefault) => {
                f.write_str("GENERATED BY DEFAULT AS IDENTITY")
            }
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableConstraintDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {name} ")?;
        }
        match &self.constraint {
            TableConstraint::PrimaryKey(columns) => {
                f.write_str("PRIMARY KEY ")?;
                paren_list(f, columns)
            }
            TableConstraint::Unique(columns) => {
                f.write_str("UNIQUE ")?;
                paren_list(f, columns)
            }
            TableConstraint::ForeignKey {
                columns,
                references,
            } => {
                f.write_str("FOREIGN KEY ")?;
                paren_list(f, columns)?;
                write!(f, " {references}")
            }
            TableConstraint::Check(expr) => write!(f, "CHECK ({expr})"),
        }
    }
}

impl fmt::Display for IndexColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match self.descending {
            Some(true) => f.write_str(" DESC"),
            Some(false) => f.write_str(" ASC"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for AlterTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddColumn(column) => write!(f, "ADD COLUMN {column}"),
            Self::AddConstraint(constraint) => write!(f, "ADD {constraint}"),
            Self::DropColumn { name, behavior } => {
                write!(f, "DROP COLUMN {name}")?;
                if let Some(behavior) = behavior {
                    write!(f, " {}", behavior.as_str())?;
                }
                Ok(())
            }
            Self::DropConstraint(name) => write!(f, "DROP CONSTRAINT {name}"),
            Self::SetColumnDefault { column, default } => {
                write!(f, "ALTER COLUMN {column} SET DEFAULT {default}")
            }
        }
    }
}

impl fmt::Display for SchemaTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Parameter(p) => write!(f, "{p}"),
            Self::CurrentUser => f.write_str("CURRENT_USER"),
        }
    }
}

impl fmt::Display for Statement {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => write!(f, "{query}"),
            Self::Insert(insert) => {
                write!(f, "INSERT INTO {}", insert.table)?;
                if !insert.columns.is_empty() {
                    f.write_str(" ")?;
                    paren_list(f, &insert.columns)?;
                }
                match &insert.source {
                    InsertSource::Query(query) => write!(f, " {query}"),
                    InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES"),
                }
            }
            Self::Update(update) => {
                write!(f, "UPDATE {}", update.table)?;
                if let Some(alias) = &update.alias {
                    write!(f, " AS {alias}")?;
                }
                f.write_str(" SET ")?;
                for (i, assignment) in update.assignments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} = {}", assignment.column, assignment.value)?;
                }
                if let Some(clause) = &update.where_clause {
                    write!(f, "{clause}")?;
                }
                Ok(())
            }
            Self::Delete(delete) => {
                write!(f, "DELETE FROM {}", delete.table)?;
                if let Some(alias) = &delete.alias {
                    write!(f, " AS {alias}")?;
                }
                if let Some(clause) = &delete.where_clause {
                    write!(f, "{clause}")?;
                }
                Ok(())
            }
            Self::CreateTable(create) => {
                write!(f, "CREATE TABLE {}", create.name)?;
                match &create.body {
                    CreateTableBody::Elements {
                        columns,
                        constraints,
                    } => {
                        f.write_str(" (")?;
                        comma_list(f, columns)?;
                        for constraint in constraints {
                            write!(f, ", {constraint}")?;
                        }
                        f.write_str(")")
                    }
                    CreateTableBody::AsQuery {
                        columns,
                        query,
                        with_data,
                    } => {
                        if !columns.is_empty() {
                            f.write_str(" ")?;
                            paren_list(f, columns)?;
                        }
                        write!(f, " AS {query} WITH ")?;
                        f.write_str(if *with_data { "DATA" } else { "NO DATA" })
                    }
                }
            }
            Self::CreateView(view) => {
                write!(f, "CREATE VIEW {}", view.name)?;
                if !view.columns.is_empty() {
                    f.write_str(" ")?;
                    paren_list(f, &view.columns)?;
                }
                write!(f, " AS {}", view.query)
            }
            Self::CreateIndex(index) => {
                f.write_str("CREATE ")?;
                if index.unique {
                    f.write_str("UNIQUE ")?;
                }
                write!(f, "INDEX {} ON {} ", index.name, index.table)?;
                paren_list(f, &index.columns)
            }
            Self::CreateSchema { name, .. } => write!(f, "CREATE SCHEMA {name}"),
            Self::Drop(drop) => {
                write!(f, "DROP {} {}", drop.object_type.as_str(), drop.name)?;
                if let Some(behavior) = drop.behavior {
                    write!(f, " {}", behavior.as_str())?;
                }
                Ok(())
            }
            Self::AlterTable(alter) => write!(f, "ALTER TABLE {} {}", alter.name, alter.action),
            Self::Commit { .. } => f.write_str("COMMIT"),
            Self::Rollback { savepoint, .. } => {
                f.write_str("ROLLBACK")?;
                match savepoint {
                    Some(Some(name)) => write!(f, " TO SAVEPOINT {name}"),
                    Some(None) => f.write_str(" TO SAVEPOINT"),
                    None => Ok(()),
                }
            }
            Self::Savepoint { name, .. } => write!(f, "SAVEPOINT {name}"),
            Self::ReleaseSavepoint { name, .. } => write!(f, "RELEASE SAVEPOINT {name}"),
            Self::SetIsolation { level, .. } => {
                write!(f, "SET ISOLATION {}", level.abbreviation())
            }
            Self::SetSchema { target, .. } => write!(f, "SET SCHEMA {target}"),
            Self::LockTable { table, mode, .. } => write!(
                f,
                "LOCK TABLE {table} IN {} MODE",
                match mode {
                    LockMode::Share => "SHARE",
                    LockMode::Exclusive => "EXCLUSIVE",
                }
            ),
        }
    }
}

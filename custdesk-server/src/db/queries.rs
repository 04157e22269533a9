//! Every statement the service runs against the `customers` table

use super::Statement;

pub const INSERT_CUSTOMER: Statement = Statement::write(
    "customers.insert",
    r#"
    INSERT INTO customers (customer_id, customer_name, age, gender)
    VALUES (?, ?, ?, ?)
    "#,
);

pub const SELECT_CUSTOMER: Statement = Statement::read(
    "customers.select_one",
    "SELECT customer_id, customer_name, age, gender FROM customers WHERE customer_id = ?",
);

pub const SELECT_ALL_CUSTOMERS: Statement = Statement::read(
    "customers.select_all",
    "SELECT customer_id, customer_name, age, gender FROM customers",
);

/// Parameters: name, age, gender, id.
pub const UPDATE_CUSTOMER: Statement = Statement::write(
    "customers.update",
    r#"
    UPDATE customers
    SET customer_name = ?, age = ?, gender = ?
    WHERE customer_id = ?
    "#,
);

pub const DELETE_CUSTOMER: Statement = Statement::write(
    "customers.delete",
    "DELETE FROM customers WHERE customer_id = ?",
);

pub const COUNT_CUSTOMERS: Statement = Statement::read(
    "customers.count",
    "SELECT COUNT(*) AS customer_count FROM customers",
);

pub const ALL: &[Statement] = &[
    INSERT_CUSTOMER,
    SELECT_CUSTOMER,
    SELECT_ALL_CUSTOMERS,
    UPDATE_CUSTOMER,
    DELETE_CUSTOMER,
    COUNT_CUSTOMERS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StatementKind;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn kinds_match_sql_verb() {
        for stmt in ALL {
            let verb = stmt.sql.trim_start().split_whitespace().next().unwrap();
            let is_select = verb.eq_ignore_ascii_case("SELECT");
            assert_eq!(
                stmt.kind == StatementKind::Read,
                is_select,
                "{} tagged {:?}",
                stmt.name,
                stmt.kind
            );
        }
    }

    #[test]
    fn placeholder_counts() {
        assert_eq!(INSERT_CUSTOMER.placeholders(), 4);
        assert_eq!(SELECT_CUSTOMER.placeholders(), 1);
        assert_eq!(SELECT_ALL_CUSTOMERS.placeholders(), 0);
        assert_eq!(UPDATE_CUSTOMER.placeholders(), 4);
        assert_eq!(DELETE_CUSTOMER.placeholders(), 1);
        assert_eq!(COUNT_CUSTOMERS.placeholders(), 0);
    }
}

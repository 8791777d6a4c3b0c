//! Merge, classification and projection tests.
//!
//! Run with: `cargo test --test recon_tests`

#![cfg(feature = "recon")]

use camt_recon::camt053;
use camt_recon::core::*;
use camt_recon::recon::*;

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

const NS: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.02";

/// One entry per `(indicator, debtor, address, description)`, each with a single `TxDtls`.
fn statement(entries: &[(&str, Option<&str>, Option<&str>, Option<&str>)]) -> String {
    let mut body = String::new();
    for (cd, debtor, address, description) in entries {
        body.push_str(&format!(
            r#"<Ntry><Amt Ccy="EUR">100.00</Amt><CdtDbtInd>{cd}</CdtDbtInd><NtryDtls><TxDtls>"#
        ));
        if debtor.is_some() || address.is_some() {
            body.push_str("<RltdPties><Dbtr>");
            if let Some(name) = debtor {
                body.push_str(&format!("<Nm>{name}</Nm>"));
            }
            if let Some(line) = address {
                body.push_str(&format!("<PstlAdr><AdrLine>{line}</AdrLine></PstlAdr>"));
            }
            body.push_str("</Dbtr></RltdPties>");
        }
        if let Some(text) = description {
            body.push_str(&format!("<RmtInf><Ustrd>{text}</Ustrd></RmtInf>"));
        }
        body.push_str("</TxDtls></NtryDtls></Ntry>");
    }
    format!(r#"<Document xmlns="{NS}"><BkToCstmrStmt><Stmt>{body}</Stmt></BkToCstmrStmt></Document>"#)
}

fn rows_of(xml: &str, source: &str) -> Vec<Row> {
    camt053::extract_str(xml, source).unwrap()
}

fn full() -> Converter {
    Converter::new(ProjectionMode::Full).unwrap()
}

fn flag(table: &Table, row: usize) -> bool {
    match table.value(row, "is_invoice_payment") {
        Some(Cell::Flag(b)) => *b,
        other => panic!("row {row}: unexpected is_invoice_payment {other:?}"),
    }
}

fn text(table: &Table, row: usize, column: &str) -> String {
    table
        .value(row, column)
        .map(|c| c.to_string())
        .unwrap_or_default()
}

// --- Classification ---

#[test]
fn debits_are_never_invoice_payments() {
    let xml = statement(&[
        ("DBIT", Some("Kunde AG"), None, Some("RE 2024001")),
        ("CRDT", Some("Kunde AG"), None, Some("RE 2024002")),
    ]);
    let table = full().finish(rows_of(&xml, "a.xml"));
    assert!(!flag(&table, 0));
    assert!(flag(&table, 1));
    // The invoice number is still derived for the debit line.
    assert_eq!(text(&table, 0, "Inv.no."), "2024001");
}

#[test]
fn processor_counterparties_are_disqualified() {
    let xml = statement(&[
        ("CRDT", Some("ADYEN N.V."), None, None),
        ("CRDT", Some("u.s. bank national association"), None, None),
        ("CRDT", Some("Elavon Financial Services"), None, None),
        ("CRDT", Some("Kunde AG"), Some("c/o Stripe, Dublin"), None),
        ("CRDT", Some("Kunde AG"), None, Some("stripe payout")),
        ("CRDT", Some("Kunde AG"), Some("Marienplatz 1"), Some("RE 123456")),
    ]);
    let table = full().finish(rows_of(&xml, "a.xml"));
    let flags: Vec<bool> = (0..table.len()).map(|i| flag(&table, i)).collect();
    assert_eq!(flags, [false, false, false, false, false, true]);
}

#[test]
fn description_rule_is_case_insensitive_on_lower_case_text() {
    let xml = statement(&[("CRDT", None, None, Some("Auszahlung Stripe Technology"))]);
    let table = full().finish(rows_of(&xml, "a.xml"));
    assert!(!flag(&table, 0));
}

#[test]
fn absent_columns_do_not_disqualify() {
    // No debtor, no address, no description anywhere in the merged rows.
    let xml = format!(
        r#"<Document xmlns="{NS}"><BkToCstmrStmt><Stmt>
            <Ntry><Amt>1.00</Amt><CdtDbtInd>CRDT</CdtDbtInd></Ntry>
            <Ntry><Amt>2.00</Amt><CdtDbtInd>CRDT</CdtDbtInd></Ntry>
        </Stmt></BkToCstmrStmt></Document>"#
    );
    let table = full().finish(rows_of(&xml, "a.xml"));
    assert!(flag(&table, 0));
    assert!(flag(&table, 1));
    assert_eq!(text(&table, 0, "Inv.no."), "");
    assert_eq!(text(&table, 0, "Note"), "");
}

#[test]
fn rows_without_indicator_stay_invoice_payments() {
    let xml = format!(
        r#"<Document xmlns="{NS}"><BkToCstmrStmt><Stmt>
            <Ntry><Amt>1.00</Amt><CdtDbtInd>DBIT</CdtDbtInd></Ntry>
            <Ntry><Amt>2.00</Amt></Ntry>
            <Ntry><Amt>3.00</Amt><CdtDbtInd>sideways</CdtDbtInd></Ntry>
        </Stmt></BkToCstmrStmt></Document>"#
    );
    let table = full().finish(rows_of(&xml, "a.xml"));
    assert!(!flag(&table, 0));
    assert!(flag(&table, 1));
    assert!(flag(&table, 2));
}

#[test]
fn invoice_number_and_note_columns() {
    let xml = statement(&[
        ("CRDT", None, None, Some("Payment ref 123456 for order")),
        ("CRDT", None, None, Some("order 12345678")),
        ("CRDT", None, None, Some("id 12 3456")),
        ("CRDT", None, None, None),
    ]);
    let table = full().finish(rows_of(&xml, "a.xml"));

    assert_eq!(text(&table, 0, "Inv.no."), "123456");
    assert_eq!(text(&table, 0, "Note"), INVOICE_NOTE);
    for row in 1..4 {
        assert_eq!(text(&table, row, "Inv.no."), "", "row {row}");
        assert_eq!(text(&table, row, "Note"), "", "row {row}");
    }
    for row in 0..4 {
        assert_eq!(table.value(row, "Comment"), Some(&Cell::Text(String::new())));
    }
}

#[test]
fn custom_policy_replaces_vendor_list() {
    let policy = InvoicePolicy {
        rules: vec![DisqualifyRule::new(RuleField::DebtorName, &["PayPal"])],
        exclude_debits: false,
    };
    let converter = Converter::with_policy(ProjectionMode::Full, &policy).unwrap();
    let xml = statement(&[
        ("CRDT", Some("PAYPAL EUROPE"), None, None),
        ("CRDT", Some("Stripe Payments"), None, None),
        ("DBIT", Some("Kunde AG"), None, None),
    ]);
    let table = converter.finish(rows_of(&xml, "a.xml"));
    assert!(!flag(&table, 0));
    assert!(flag(&table, 1));
    assert!(flag(&table, 2));
}

#[test]
fn policy_round_trips_through_json() {
    let policy = InvoicePolicy::default();
    let json = serde_json::to_string(&policy).unwrap();
    assert!(json.contains("\"debtor_name\""));
    let back: InvoicePolicy = serde_json::from_str(&json).unwrap();
    assert_eq!(back, policy);
}

// --- Merge ---

#[test]
fn merge_keeps_document_order_and_duplicates() {
    let single = camt053::extract_file(fixture("statement_a.xml")).unwrap();
    let n = single.len();
    assert_eq!(n, 3);

    let merged = merge([single.clone(), single.clone()]);
    assert_eq!(merged.len(), 2 * n);
    assert_eq!(&merged[..n], single.as_slice());
    assert_eq!(&merged[n..], single.as_slice());

    // Rows of the same file at the same position are the same row.
    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<Row> = merged
        .iter()
        .enumerate()
        .filter(|(i, r)| seen.insert((r.source_file.clone(), i % n)))
        .map(|(_, r)| r.clone())
        .collect();
    assert_eq!(deduped, single);

    let path = fixture("statement_a.xml");
    let twice = full().convert_files(&[path.clone(), path]).unwrap();
    let once = full().finish(single);
    assert_eq!(twice.documents, 2);
    assert_eq!(twice.table.columns(), once.columns());
    assert_eq!(twice.table.rows()[..n], *once.rows());
    assert_eq!(twice.table.rows()[n..], *once.rows());
}

#[test]
fn merge_of_nothing_is_empty() {
    let merged = merge(Vec::<Vec<Row>>::new());
    assert!(merged.is_empty());
    assert!(full().finish(merged).is_empty());
}

#[test]
fn two_documents_union_of_columns() {
    let with_details = format!(
        r#"<Document xmlns="{NS}"><BkToCstmrStmt><Stmt>
            <Ntry><Amt Ccy="EUR">10.00</Amt><CdtDbtInd>CRDT</CdtDbtInd><NtryDtls>
              <TxDtls><RltdPties><Dbtr><Nm>Kunde AG</Nm></Dbtr></RltdPties></TxDtls>
              <TxDtls><RmtInf><Ustrd>RE 7654321</Ustrd></RmtInf></TxDtls>
            </NtryDtls></Ntry>
        </Stmt></BkToCstmrStmt></Document>"#
    );
    let without_details = format!(
        r#"<Document xmlns="{NS}"><BkToCstmrStmt><Stmt>
            <Ntry><Amt Ccy="USD">5.00</Amt><CdtDbtInd>CRDT</CdtDbtInd></Ntry>
        </Stmt></BkToCstmrStmt></Document>"#
    );

    let rows = merge([
        rows_of(&with_details, "a.xml"),
        rows_of(&without_details, "b.xml"),
    ]);
    let table = full().finish(rows);

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.column("source_file"),
        [
            Some(&Cell::Text("a.xml".into())),
            Some(&Cell::Text("a.xml".into())),
            Some(&Cell::Text("b.xml".into())),
        ]
    );
    assert_eq!(text(&table, 0, "debtor_name"), "Kunde AG");
    assert_eq!(table.value(1, "debtor_name"), None);
    assert_eq!(table.value(2, "description"), None);
    assert_eq!(text(&table, 1, "Inv.no."), "7654321");
    assert_eq!(text(&table, 2, "currency"), "USD");
}

// --- Projection ---

#[test]
fn full_mode_column_order_for_fixture() {
    let rows = camt053::extract_file(fixture("statement_a.xml")).unwrap();
    let table = full().finish(rows);

    let columns = table.columns();
    assert_eq!(&columns[..3], ["booking_date", "value_date", "transaction_id"]);
    assert_eq!(
        &columns[columns.len() - 11..],
        [
            "is_invoice_payment",
            "Inv.no.",
            "Note",
            "Comment",
            "statement_id",
            "statement_date",
            "status",
            "transaction_type",
            "transaction_family",
            "transaction_subfamily",
            "source_file",
        ]
    );

    assert!(flag(&table, 0));
    assert_eq!(text(&table, 0, "Inv.no."), "2024117");
    assert!(!flag(&table, 1), "Stripe payout");
    assert_eq!(text(&table, 1, "Inv.no."), "");
    assert!(!flag(&table, 2), "debit");
}

#[test]
fn raw_mode_has_no_enrichment_columns() {
    let rows = camt053::extract_file(fixture("statement_a.xml")).unwrap();
    let table = Converter::new(ProjectionMode::Raw).unwrap().finish(rows);

    assert_eq!(table.columns()[0], "account_iban");
    assert_eq!(table.columns().last().map(String::as_str), Some("source_file"));
    for name in ["is_invoice_payment", "Inv.no.", "Note", "Comment"] {
        assert_eq!(table.column_index(name), None, "{name}");
    }
}

#[test]
fn projection_keeps_exactly_the_populated_columns() {
    let rows = merge([
        camt053::extract_file(fixture("statement_a.xml")).unwrap(),
        camt053::extract_file(fixture("statement_b.nda")).unwrap(),
    ]);
    let unprojected = Table::from_rows(&rows);

    for mode in [ProjectionMode::Full, ProjectionMode::Raw] {
        let projected = ColumnProjector::new(mode).project(&unprojected);
        let mut before: Vec<_> = unprojected.columns().to_vec();
        let mut after: Vec<_> = projected.columns().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after, "{mode:?}");
        assert_eq!(projected.len(), unprojected.len());
    }
}

#[test]
fn custom_projector_order() {
    let rows = camt053::extract_file(fixture("statement_b.nda")).unwrap();
    let converter = Converter::new(ProjectionMode::Raw)
        .unwrap()
        .with_projector(ColumnProjector::with_preferred(["source_file", "amount"]));
    let table = converter.finish(rows);
    assert_eq!(&table.columns()[..2], ["source_file", "amount"]);
    assert_eq!(table.value(0, "amount"), Some(&Cell::Number(rust_decimal_macros::dec!(75.40))));
}

// --- File-list conversion ---

#[test]
fn convert_files_aborts_on_first_failure() {
    let converter = full();
    let err = converter
        .convert_files(&[fixture("statement_a.xml"), fixture("broken.xml")])
        .unwrap_err();
    assert_eq!(err.file(), Some("broken.xml"));
}

#[test]
fn convert_files_merges_in_given_order() {
    let conversion = full()
        .convert_files(&[fixture("statement_b.nda"), fixture("statement_a.xml")])
        .unwrap();
    assert_eq!(conversion.documents, 2);
    assert_eq!(conversion.table.len(), 4);
    assert_eq!(text(&conversion.table, 0, "source_file"), "statement_b.nda");
    assert_eq!(text(&conversion.table, 3, "source_file"), "statement_a.xml");
}

#[test]
fn convert_files_with_empty_selection() {
    let conversion = full().convert_files::<&str>(&[]).unwrap();
    assert!(conversion.is_empty());
    assert_eq!(conversion.documents, 0);
}

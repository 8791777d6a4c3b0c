use camt_recon::camt053;
use camt_recon::export;
use camt_recon::recon::{Converter, ProjectionMode, merge};

const MARCH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <BkToCstmrStmt>
    <Stmt>
      <Id>STMT-2024-03</Id>
      <Acct><Id><IBAN>DE89370400440532013000</IBAN></Id><Ccy>EUR</Ccy></Acct>
      <Ntry>
        <Amt Ccy="EUR">1190.00</Amt>
        <CdtDbtInd>CRDT</CdtDbtInd>
        <BookgDt><Dt>2024-03-05</Dt></BookgDt>
        <NtryDtls>
          <TxDtls>
            <RltdPties><Dbtr><Nm>Kunde AG</Nm></Dbtr></RltdPties>
            <RmtInf><Ustrd>Rechnung 2024031</Ustrd></RmtInf>
          </TxDtls>
          <TxDtls>
            <RltdPties><Dbtr><Nm>Stripe Payments Europe</Nm></Dbtr></RltdPties>
            <RmtInf><Ustrd>Payout 4711</Ustrd></RmtInf>
          </TxDtls>
        </NtryDtls>
      </Ntry>
    </Stmt>
  </BkToCstmrStmt>
</Document>"#;

const APRIL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.08">
  <BkToCstmrStmt>
    <Stmt>
      <Id>STMT-2024-04</Id>
      <Acct><Id><IBAN>DE89370400440532013000</IBAN></Id><Ccy>EUR</Ccy></Acct>
      <Ntry>
        <Amt Ccy="EUR">49.90</Amt>
        <CdtDbtInd>DBIT</CdtDbtInd>
        <BookgDt><Dt>2024-04-02</Dt></BookgDt>
      </Ntry>
    </Stmt>
  </BkToCstmrStmt>
</Document>"#;

fn main() {
    let march = camt053::extract_str(MARCH, "2024-03.xml").expect("March statement");
    let april = camt053::extract_str(APRIL, "2024-04.nda").expect("April statement");
    println!("Extracted {} + {} rows", march.len(), april.len());

    let rows = merge([march, april]);

    // Reconciliation view: classification plus invoice numbers
    let table = Converter::new(ProjectionMode::Full)
        .expect("default policy")
        .finish(rows.clone());
    for i in 0..table.len() {
        let show = |name: &str| {
            table
                .value(i, name)
                .map(|c| c.to_string())
                .unwrap_or_default()
        };
        println!(
            "{} {:>8} {}  invoice payment: {:<5} Inv.no.: {}",
            show("booking_date"),
            show("amount"),
            show("credit_debit"),
            show("is_invoice_payment"),
            show("Inv.no."),
        );
    }

    // Plain extraction view as CSV
    let raw = Converter::new(ProjectionMode::Raw)
        .expect("default policy")
        .finish(rows);
    println!();
    print!("{}", export::to_csv_string(&raw).expect("CSV export"));
}

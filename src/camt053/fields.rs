//! Field extractors for the `Acct`, `Stmt`, `Bal`, `Ntry` and `TxDtls` blocks.
//!
//! Each extractor only sets the fields it finds; a missing element never
//! becomes an error. Only numeric text that fails to parse aborts the document.

use tracing::warn;

use super::tree::{Document, Element, non_empty};
use crate::core::{
    AccountInfo, Balance, BalanceType, CamtError, CreditDebit, CurrencyExchange, DEFAULT_CURRENCY,
    Entry, StatementInfo, TransactionDetail,
};

/// Separator between unstructured remittance fragments.
pub const DESCRIPTION_SEPARATOR: &str = " | ";

/// `Acct` block.
pub fn account_info(doc: &Document, acct: &Element) -> AccountInfo {
    AccountInfo {
        iban: doc.text(acct, "Id/IBAN"),
        currency: doc.text(acct, "Ccy"),
        owner: doc.text(acct, "Ownr/Nm"),
        servicer_bic: doc.text_any(acct, &["Svcr/FinInstnId/BIC", "Svcr/FinInstnId/BICFI"]),
    }
}

/// `Stmt` block.
pub fn statement_info(doc: &Document, stmt: &Element) -> StatementInfo {
    StatementInfo {
        id: doc.text(stmt, "Id"),
        creation_timestamp: doc.text(stmt, "CreDtTm"),
    }
}

/// `Bal` block.
///
/// Returns `None` for balance types other than `OPBD`/`CLBD`, and for
/// balances lacking an amount or a usable credit/debit indicator.
pub fn balance(doc: &Document, bal: &Element) -> Result<Option<(BalanceType, Balance)>, CamtError> {
    let Some(kind) = doc
        .text(bal, "Tp/CdOrPrtry/Cd")
        .and_then(|code| BalanceType::from_code(&code))
    else {
        return Ok(None);
    };

    let Some(amount_el) = doc.find(bal, "Amt") else {
        return Ok(None);
    };
    let Some(raw_amount) = non_empty(amount_el.text()) else {
        return Ok(None);
    };
    let Some(credit_debit) = indicator(doc, bal) else {
        return Ok(None);
    };

    let amount = doc.parse_decimal(&raw_amount, "balance amount")?;
    Ok(Some((
        kind,
        Balance {
            amount,
            currency: currency_of(amount_el),
            credit_debit,
            date: doc.text_any(bal, &["Dt/Dt", "Dt/DtTm"]),
        },
    )))
}

/// `Ntry` block, without its transaction details.
pub fn entry(doc: &Document, ntry: &Element) -> Result<Entry, CamtError> {
    let mut entry = Entry {
        transaction_id: doc.text(ntry, "NtryRef"),
        credit_debit: indicator(doc, ntry),
        status: doc.text_any(ntry, &["Sts", "Sts/Cd"]),
        booking_date: doc.text_any(ntry, &["BookgDt/Dt", "BookgDt/DtTm"]),
        value_date: doc.text_any(ntry, &["ValDt/Dt", "ValDt/DtTm"]),
        bank_reference: doc.text(ntry, "AcctSvcrRef"),
        transaction_type: doc.text(ntry, "BkTxCd/Domn/Cd"),
        transaction_family: doc.text(ntry, "BkTxCd/Domn/Fmly/Cd"),
        transaction_subfamily: doc.text(ntry, "BkTxCd/Domn/Fmly/SubFmlyCd"),
        ..Default::default()
    };

    if let Some(amount_el) = doc.find(ntry, "Amt") {
        if let Some(raw) = non_empty(amount_el.text()) {
            entry.amount = Some(doc.parse_decimal(&raw, "amount")?);
            entry.currency = Some(currency_of(amount_el));
        }
    }

    Ok(entry)
}

/// `TxDtls` block.
pub fn transaction_detail(doc: &Document, tx: &Element) -> Result<TransactionDetail, CamtError> {
    let exchange = match (
        doc.text(tx, "AmtDtls/TxAmt/CcyXchg/SrcCcy"),
        doc.text(tx, "AmtDtls/TxAmt/CcyXchg/TrgtCcy"),
    ) {
        (Some(source_currency), Some(target_currency)) => Some(CurrencyExchange {
            source_currency,
            target_currency,
            rate: doc.decimal(tx, "AmtDtls/TxAmt/CcyXchg/XchgRate", "exchange_rate")?,
        }),
        _ => None,
    };

    let fragments: Vec<String> = doc
        .find_descendants(tx, "Ustrd")
        .into_iter()
        .filter_map(|el| non_empty(el.text()))
        .collect();
    let description = if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(DESCRIPTION_SEPARATOR))
    };

    Ok(TransactionDetail {
        transaction_reference: doc.text(tx, "Refs/AcctSvcrRef"),
        instructed_amount: doc.decimal(tx, "AmtDtls/InstdAmt/Amt", "instructed_amount")?,
        transaction_amount: doc.decimal(tx, "AmtDtls/TxAmt/Amt", "transaction_amount")?,
        exchange,
        // camt.053.001.08 and later wrap the party in `Pty`.
        debtor_name: doc.text_any(tx, &["RltdPties/Dbtr/Nm", "RltdPties/Dbtr/Pty/Nm"]),
        debtor_address: doc.text_any(
            tx,
            &[
                "RltdPties/Dbtr/PstlAdr/AdrLine",
                "RltdPties/Dbtr/Pty/PstlAdr/AdrLine",
            ],
        ),
        creditor_name: doc.text_any(tx, &["RltdPties/Cdtr/Nm", "RltdPties/Cdtr/Pty/Nm"]),
        debtor_bank_bic: doc.text_any(
            tx,
            &[
                "RltdAgts/DbtrAgt/FinInstnId/BIC",
                "RltdAgts/DbtrAgt/FinInstnId/BICFI",
            ],
        ),
        debtor_bank_name: doc.text(tx, "RltdAgts/DbtrAgt/FinInstnId/Nm"),
        debtor_bank_country: doc.text(tx, "RltdAgts/DbtrAgt/FinInstnId/PstlAdr/Ctry"),
        description,
    })
}

fn currency_of(amount: &Element) -> String {
    amount
        .attribute("Ccy")
        .and_then(non_empty)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

fn indicator(doc: &Document, ctx: &Element) -> Option<CreditDebit> {
    let raw = doc.text(ctx, "CdtDbtInd")?;
    let parsed = CreditDebit::from_code(&raw);
    if parsed.is_none() {
        warn!(file = doc.source(), indicator = %raw, "ignoring unknown credit/debit indicator");
    }
    parsed
}

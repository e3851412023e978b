// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use crate::infrastructure::network::provider::HttpProvider;
use crate::services::router::abi::{BoostedQuoter, IMulticall3};
use crate::services::router::quoter::QuoterBackend;
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

/// Quoter interpreter reached over JSON-RPC `eth_call`.
#[derive(Clone)]
pub struct RpcQuoterBackend {
    provider: HttpProvider,
    quoter: Address,
    multicall: Address,
}

impl RpcQuoterBackend {
    pub fn new(provider: HttpProvider, quoter: Address, multicall: Address) -> Self {
        Self {
            provider,
            quoter,
            multicall,
        }
    }

    fn aggregate_calls(&self, calls: Vec<(Bytes, Vec<Bytes>)>) -> Vec<IMulticall3::Call3> {
        calls
            .into_iter()
            .map(|(commands, inputs)| IMulticall3::Call3 {
                target: self.quoter,
                allowFailure: true,
                callData: BoostedQuoter::executeCall { commands, inputs }.abi_encode().into(),
            })
            .collect()
    }
}

/// Decodes one `aggregate3` entry; reverts and malformed data yield `None`.
pub fn decode_aggregate_entry(entry: &IMulticall3::Result) -> Option<Vec<Bytes>> {
    if !entry.success {
        return None;
    }
    BoostedQuoter::executeCall::abi_decode_returns(&entry.returnData)
        .inspect_err(|err| {
            tracing::debug!(target: "quoter", error = %err, "Undecodable quoter return data");
        })
        .ok()
}

#[async_trait]
impl QuoterBackend for RpcQuoterBackend {
    async fn execute(&self, commands: Bytes, inputs: Vec<Bytes>) -> Result<Vec<Bytes>, AppError> {
        let quoter = BoostedQuoter::new(self.quoter, self.provider.clone());
        quoter
            .execute(commands, inputs)
            .call()
            .await
            .map_err(|e| AppError::Quote(format!("quoter call failed: {e}")))
    }

    async fn execute_batch(&self, calls: Vec<(Bytes, Vec<Bytes>)>) -> Result<Vec<Option<Vec<Bytes>>>, AppError> {
        let count = calls.len();
        let multicall = IMulticall3::new(self.multicall, self.provider.clone());
        let results = multicall
            .aggregate3(self.aggregate_calls(calls))
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("multicall failed: {e}")))?;
        if results.len() != count {
            return Err(AppError::Quote(format!(
                "multicall returned {} results for {count} calls",
                results.len()
            )));
        }
        Ok(results.iter().map(decode_aggregate_entry).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::network::provider::ConnectionFactory;
    use alloy::sol_types::SolValue;

    #[test]
    fn aggregate_calls_target_the_quoter_and_allow_failure() {
        let provider = ConnectionFactory::http("http://127.0.0.1:1").expect("provider");
        let quoter = Address::from([0x51; 20]);
        let backend = RpcQuoterBackend::new(provider, quoter, Address::from([0xca; 20]));
        let calls = backend.aggregate_calls(vec![(Bytes::from(vec![0x00]), vec![Bytes::from(vec![1, 2])])]);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].target, quoter);
        assert!(calls[0].allowFailure);
        let decoded = BoostedQuoter::executeCall::abi_decode(&calls[0].callData).expect("decode");
        assert_eq!(decoded.commands, Bytes::from(vec![0x00]));
        assert_eq!(decoded.inputs, vec![Bytes::from(vec![1, 2])]);
    }

    #[test]
    fn failed_or_garbled_entries_become_none() {
        let outputs = vec![Bytes::from(vec![7u8; 32])];
        let ok = IMulticall3::Result {
            success: true,
            returnData: (outputs.clone(),).abi_encode_params().into(),
        };
        assert_eq!(decode_aggregate_entry(&ok), Some(outputs));

        let reverted = IMulticall3::Result {
            success: false,
            returnData: Bytes::new(),
        };
        assert_eq!(decode_aggregate_entry(&reverted), None);

        let garbled = IMulticall3::Result {
            success: true,
            returnData: Bytes::from(vec![1, 2, 3]),
        };
        assert_eq!(decode_aggregate_entry(&garbled), None);
    }
}

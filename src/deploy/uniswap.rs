//! Uniswap V2 environment: WETH, factory, router, two tokens and a funded pair.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};

use crate::config::validation::parse_amount;
use crate::config::DeployConfig;
use crate::deploy::artifacts::ArtifactSet;
use crate::deploy::contracts::{
    factory_args, router_args, token_args, IERC20, IUniswapV2Factory, IUniswapV2Pair,
    IUniswapV2Router02,
};
use crate::deploy::deployer::Deployer;
use crate::deploy::types::{DeployError, DeployResult, DeployedAddresses, DeployedToken, PairState};

/// Drives the deployment sequence.
pub struct UniswapDeployment<'a> {
    deployer: &'a Deployer,
    artifacts: &'a ArtifactSet,
    config: &'a DeployConfig,
}

impl<'a> UniswapDeployment<'a> {
    pub fn new(deployer: &'a Deployer, artifacts: &'a ArtifactSet, config: &'a DeployConfig) -> Self {
        Self {
            deployer,
            artifacts,
            config,
        }
    }

    /// Deploy WETH, the factory, the router and every configured token, in that order.
    pub async fn deploy_contracts(&self) -> DeployResult<DeployedAddresses> {
        let me = self.deployer.address();
        tracing::info!(deployer = %me, chain_id = self.deployer.chain_id(), "Deploying Uniswap V2 environment");

        let weth = self.deployer.deploy(&self.artifacts.weth, Default::default()).await?;
        let factory = self.deployer.deploy(&self.artifacts.factory, factory_args(me)).await?;
        let router = self
            .deployer
            .deploy(&self.artifacts.router, router_args(factory, weth))
            .await?;

        let mut tokens = Vec::with_capacity(self.config.tokens.len());
        for token in &self.config.tokens {
            let supply = amount(&format!("{} supply", token.symbol), &token.supply)?;
            let address = self
                .deployer
                .deploy(&self.artifacts.token, token_args(&token.name, &token.symbol, supply, me))
                .await?;
            tracing::info!(symbol = %token.symbol, address = %address, "{} Token address: {}", token.symbol, address);
            tokens.push(DeployedToken {
                name: token.name.clone(),
                symbol: token.symbol.clone(),
                address,
            });
        }

        Ok(DeployedAddresses {
            chain_id: self.deployer.chain_id(),
            deployer: me,
            weth,
            factory,
            router,
            tokens,
            pair: None,
        })
    }

    /// Approve the router, add liquidity for the first two tokens, and check the pair.
    pub async fn add_liquidity(&self, addresses: &mut DeployedAddresses) -> DeployResult<PairState> {
        let (token_a, token_b) = match addresses.tokens.as_slice() {
            [a, b, ..] => (a.address, b.address),
            tokens => {
                return Err(DeployError::Amount(format!(
                    "need two tokens to add liquidity, have {}",
                    tokens.len()
                )))
            }
        };
        let amount_desired = amount("liquidity_amount", &self.config.liquidity_amount)?;
        let router = addresses.router;

        for token in [token_a, token_b, addresses.weth] {
            self.approve(token, router, amount_desired).await?;
        }

        let call = IUniswapV2Router02::addLiquidityCall {
            tokenA: token_a,
            tokenB: token_b,
            amountADesired: amount_desired,
            amountBDesired: amount_desired,
            amountAMin: U256::ZERO,
            amountBMin: U256::ZERO,
            to: self.deployer.address(),
            deadline: deadline(self.config.deadline_secs),
        };
        self.deployer.send_call("addLiquidity", router, &call).await?;

        let state = self.check_pair(addresses.factory, token_a, token_b).await?;
        addresses.pair = Some(state.pair);
        Ok(state)
    }

    /// Look the pair up in the factory and read its reserves.
    pub async fn check_pair(&self, factory: Address, token_a: Address, token_b: Address) -> DeployResult<PairState> {
        let pair = self
            .deployer
            .read(
                factory,
                &IUniswapV2Factory::getPairCall {
                    tokenA: token_a,
                    tokenB: token_b,
                },
            )
            .await?;
        if pair == Address::ZERO {
            return Err(DeployError::MissingAddress(format!("pair {}/{}", token_a, token_b)));
        }

        let reserves = self
            .deployer
            .read(pair, &IUniswapV2Pair::getReservesCall {})
            .await?;
        let state = PairState {
            pair,
            reserve0: U256::from(reserves.reserve0),
            reserve1: U256::from(reserves.reserve1),
        };

        tracing::info!(
            pair = %pair,
            reserve0 = %format_ether(state.reserve0),
            reserve1 = %format_ether(state.reserve1),
            "Pair reserves"
        );
        Ok(state)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> DeployResult<()> {
        let call = IERC20::approveCall { spender, amount };
        self.deployer
            .send_call(&format!("approve {}", token), token, &call)
            .await?;
        Ok(())
    }
}

fn amount(field: &str, value: &str) -> DeployResult<U256> {
    parse_amount(field, value).map_err(|e| DeployError::Amount(e.to_string()))
}

/// Unix timestamp `secs_from_now` seconds ahead.
fn deadline(secs_from_now: u64) -> U256 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    U256::from(now.saturating_add(secs_from_now))
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract UniversalRouter {
        function execute(bytes commands, bytes[] inputs) external payable;
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract UniversalRouterDeadline {
        function execute(bytes commands, bytes[] inputs, uint256 deadline) external payable;
    }

    /// Simulate-only interpreter; returns one output blob per command.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract BoostedQuoter {
        function execute(bytes commands, bytes[] inputs) external returns (bytes[] outputs);
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }
        struct Result {
            bool success;
            bytes returnData;
        }
        function aggregate3(Call3[] calldata calls) external payable returns (Result[] memory returnData);
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract IERC4626 {
        function asset() external view returns (address);
        function previewDeposit(uint256 assets) external view returns (uint256 shares);
        function previewMint(uint256 shares) external view returns (uint256 assets);
        function previewWithdraw(uint256 assets) external view returns (uint256 shares);
        function previewRedeem(uint256 shares) external view returns (uint256 assets);
    }
}

// Command inputs. Encoded as parameter lists (`abi_encode_params`), which is
// how the interpreter's calldata decoders read them.
sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct V2SwapExactInParams {
        address recipient;
        uint256 amountIn;
        uint256 amountOutMin;
        address[] path;
        bool payerIsUser;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct V2SwapExactOutParams {
        address recipient;
        uint256 amountOut;
        uint256 amountInMax;
        address[] path;
        bool payerIsUser;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PackedSwapExactInParams {
        address recipient;
        uint256 amountIn;
        uint256 amountOutMin;
        bytes path;
        bool payerIsUser;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PackedSwapExactOutParams {
        address recipient;
        uint256 amountOut;
        uint256 amountInMax;
        bytes path;
        bool payerIsUser;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PermitDetails {
        address token;
        uint160 amount;
        uint48 expiration;
        uint48 nonce;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PermitSingle {
        PermitDetails details;
        address spender;
        uint256 sigDeadline;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Permit2PermitParams {
        PermitSingle permitSingle;
        bytes signature;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Permit2TransferFromParams {
        address token;
        address recipient;
        uint160 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SweepParams {
        address token;
        address recipient;
        uint256 amountMin;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct WrapEthParams {
        address recipient;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct UnwrapWethParams {
        address recipient;
        uint256 amountMin;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Erc4626WrapParams {
        address wrapper;
        address underlying;
        address recipient;
        uint256 amount;
        uint256 minAmountOut;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Erc4626UnwrapParams {
        address wrapper;
        address recipient;
        uint256 amount;
        uint256 minAmountOut;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SubPlanParams {
        bytes commands;
        bytes[] inputs;
    }
}

// Quoter outputs.
sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct SwapQuoteOutput {
        uint256 amount;
        uint160[] sqrtPriceX96AfterList;
        uint256 gasEstimate;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct VaultQuoteOutput {
        uint256 amount;
    }
}

//! ABI bindings for the ledger contract.

use alloy::sol;

sol! {
    /// Ledger contract entry points. Function names match the deployed ABI.
    #[derive(Debug)]
    interface LedgerContract {
        function balance() external view returns (uint256);
        function admin() external view returns (address);
        function deposite(uint256 amount) external payable;
        function withdrawl(uint256 amount) external;
    }
}

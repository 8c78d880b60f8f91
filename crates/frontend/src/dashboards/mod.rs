pub mod d500_kpi;

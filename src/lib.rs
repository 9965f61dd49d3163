pub mod configuration;

pub mod math {
    pub mod notation;
    pub mod quadrature {
        pub mod quadraturerule;
        pub mod parabolarule;
    }
}

pub mod problem {
    pub mod integrationproblem;
}

pub mod refinement {
    pub mod diagnosticrecord;
    pub mod evaluationcache;
    pub mod refinementerror;
    pub mod refinementdriver;
    pub mod refinementreport;
}

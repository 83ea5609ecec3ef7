mod presenter_test;
